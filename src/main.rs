use relstamp::{
    cfg::Cfg,
    error::Error,
    humanize::Formatter,
    locale::Locale,
    page::Document,
    refresh::Refresher,
    ticker,
    time::{parse_offset, SystemClock},
};
use config::Config;
use log::*;
use once_cell::sync::Lazy;
use semver::Version;
use std::{env, fs, process, sync::Arc};

// version of this binary
static VERSION: Lazy<Version> = Lazy::new(|| Version::parse(env!("CARGO_PKG_VERSION")).unwrap());

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let mut p = env::current_exe()?;
    p.pop();

    let main = p.join("config.json5");
    if !main.exists() {
        fs::write(&main, serde_json::to_string_pretty(&Cfg::default())?)?;
    }

    let mode = env::args().nth(1);
    if mode.as_deref() == Some("init") {
        // our job here is done
        info!("Default config in place at {}", main.display());
        return Ok(());
    }

    let cfg: Cfg = Config::builder()
        .add_source(config::File::from(p.join("config")))
        .add_source(config::File::from(p.join("config.local")).required(false))
        .add_source(config::Environment::with_prefix("RELSTAMP").separator("__"))
        .build()?
        .try_deserialize()?;

    let zone = parse_offset(&cfg.utc_offset).ok_or_else(|| Error::Offset(cfg.utc_offset.clone()))?;
    let locale = Locale::from_tag(&cfg.locale);
    let out = cfg.output().clone();
    let html = cfg.html.clone();
    let target = cfg.target.clone();

    info!(
        "relstamp v{} refreshing {} every {} ({}, UTC{})",
        *VERSION,
        cfg.page.display(),
        humantime::format_duration(cfg.period),
        locale,
        zone
    );
    debug!("Target: {:?}, writing to {}", target, out.display());

    let mut doc = Document::load(&cfg.page)?;
    let refresher = Refresher::new(Formatter::new(locale, zone), Arc::new(SystemClock));

    let mut cycle = move || {
        refresher.cycle(&mut doc, &target, &out, html.as_deref());
    };

    if mode.as_deref() == Some("once") {
        cycle();
        return Ok(());
    }

    let period = cfg.period;
    tokio::task::spawn(async move {
        debug!("- Refresh task spawned!");
        ticker::run_forever(period, cycle).await
    })
    .await?;

    Ok(())
}
