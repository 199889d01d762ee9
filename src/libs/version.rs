use log::info;
use std::env;

pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub fn get_build_version() -> String {
    let key = "GAMESEARCH_BUILD";
    match env::var(key) {
        Ok(val) => val,
        Err(_e) => "__NO_VERSION_AVAILABLE__".to_string(),
    }
}

pub fn print_version() {
    let app_version = get_app_version();
    let build_version = get_build_version();

    info!("App: {app_version}");
    info!("Build: {build_version}");
}
