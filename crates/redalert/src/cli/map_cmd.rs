//! `init` and `place-fixture` subcommands — build up a map snapshot.

use super::{
    Capabilities, Cell, Fixture, GlobalOpts, MAX_MAP_SIDE, MapSnapshot, RedAlertError, Result,
    Session, glow, load_config, resolve_state_path,
};

pub(super) struct FixtureArgs {
    pub id: String,
    pub cell: Cell,
    pub color: String,
    pub unpowered: bool,
    pub dark: bool,
}

impl FixtureArgs {
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::NONE;
        if !self.dark {
            caps = caps | Capabilities::GLOWER;
        }
        if !self.unpowered {
            caps = caps | Capabilities::POWER_TRADER;
        }
        caps
    }
}

pub(super) fn cmd_init(opts: &GlobalOpts, width: i32, height: i32, force: bool) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(RedAlertError::Config(format!(
            "map size must be positive, got {width} × {height}"
        )));
    }
    if width > MAX_MAP_SIDE || height > MAX_MAP_SIDE {
        return Err(RedAlertError::Config(format!(
            "map size is limited to {MAX_MAP_SIDE} × {MAX_MAP_SIDE}, got {width} × {height}"
        )));
    }
    let config = load_config(opts.config.as_deref());
    let path = resolve_state_path(opts, &config)?;
    if path.exists() && !force {
        return Err(RedAlertError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    MapSnapshot::new(width, height).save_to(&path)?;
    println!("Created {width} × {height} map at {}", path.display());
    Ok(())
}

pub(super) fn cmd_place_fixture(opts: &GlobalOpts, args: FixtureArgs) -> Result<()> {
    let color = glow::parse_color_or_name(&args.color)?;
    let mut session = Session::open(opts)?;
    if session.snapshot.switch(&args.id).is_some() {
        return Err(RedAlertError::Duplicate(args.id));
    }

    let capabilities = args.capabilities();
    let fixture = Fixture {
        id: args.id,
        position: args.cell,
        capabilities,
        color,
    };
    let candidate = fixture.is_alarm_candidate();
    let label = format!(
        "{} at {} ({})",
        fixture.id,
        fixture.position,
        glow::format_color(&fixture.color)
    );
    session.snapshot.map.place(fixture)?;
    session.save()?;

    if candidate {
        println!("Placed {label}");
    } else {
        println!("Placed {label}, ignored by the alarm");
    }
    Ok(())
}
