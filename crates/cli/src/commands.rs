use anyhow::{Context, Result, ensure};
use cmdtree::Invocation;

/// Largest `--precision` accepted by `sum`.
const MAX_PRECISION: usize = 32;

pub fn overview(inv: &Invocation<'_>) -> Result<()> {
    print!("{}", inv.command().render_help());
    Ok(())
}

pub fn greet(inv: &Invocation<'_>) -> Result<()> {
    let name = inv.get_string("name")?;
    let times = inv.get_int("times")?;
    ensure!(times >= 0, "--times must not be negative, got {times}");

    if inv.get_bool("verbose")? {
        eprintln!("greet: name={name:?} times={times}");
    }

    let mut line = format!("Hello, {name}!");
    if inv.get_bool("shout")? {
        line = line.to_uppercase();
    }
    for _ in 0..times {
        println!("{line}");
    }
    Ok(())
}

pub fn sum(inv: &Invocation<'_>) -> Result<()> {
    let precision = usize::try_from(inv.get_int("precision")?)
        .context("--precision must not be negative")?;
    ensure!(
        precision <= MAX_PRECISION,
        "--precision must be at most {MAX_PRECISION}, got {precision}"
    );
    let scale = inv.get_float("scale")?;

    let mut total = 0.0;
    for arg in inv.args() {
        let n: f64 = arg
            .parse()
            .with_context(|| format!("not a number: {arg:?}"))?;
        total += n;
    }

    if inv.get_bool("verbose")? {
        eprintln!("sum: {} values, scale={scale}", inv.args().len());
    }
    println!("{:.precision$}", total * scale);
    Ok(())
}

pub fn addr(inv: &Invocation<'_>) -> Result<()> {
    let host = inv.get_string("host")?;
    let port = inv.get_int("port")?;
    let port = u16::try_from(port).with_context(|| format!("port out of range: {port}"))?;

    if inv.get_bool("verbose")? {
        tracing::info!(%host, port, "resolved bind address");
    }
    println!("{host}:{port}");
    Ok(())
}

pub fn schema(inv: &Invocation<'_>) -> Result<()> {
    let json = inv
        .root()
        .metadata()
        .to_json_pretty()
        .context("failed to encode command metadata")?;
    println!("{json}");
    Ok(())
}
