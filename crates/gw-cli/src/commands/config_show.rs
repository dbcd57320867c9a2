//! `gw config-show`: what the merged config resolves to.

use anyhow::Result;
use gw_config::ConfigUse;

use super::load_config;

pub fn run(config_paths: &[String], strict: bool, json: bool) -> Result<()> {
    // Watch reads every key, so nothing a lookup skips shows up as unused.
    let loaded = load_config(config_paths, ConfigUse::Watch, strict)?;
    let app = &loaded.app;

    if json {
        let v = serde_json::json!({
            "config_hash": loaded.config_hash,
            "merged": loaded.config_json,
            "effective": app,
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    println!("api.base_url={}", app.api.base_url);
    println!("api.timeout_secs={}", app.api.timeout_secs);
    println!("api.user_agent={}", app.api.user_agent);
    println!(
        "watch.guild={}",
        app.watch.guild.as_deref().unwrap_or("<none>")
    );
    println!("watch.interval_secs={}", app.watch.interval_secs);
    Ok(())
}
