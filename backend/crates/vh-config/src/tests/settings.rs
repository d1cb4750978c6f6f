use crate::Settings;
use crate::tests::{EnvGuard, setup_config_dir};

use std::path::PathBuf;
use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, ok, some};
use serial_test::serial;

// =========================================================================
// Loading
// =========================================================================

#[test]
#[serial]
fn given_no_settings_file_when_load_then_defaults() {
    // Given
    let (_temp, _guards) = setup_config_dir();

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(settings.http.port, eq(crate::DEFAULT_HTTP_PORT));
    assert_that!(
        settings.lifecycle.startup_timeout(),
        eq(Duration::from_secs(120))
    );
    assert_that!(
        settings.lifecycle.readiness_interval(),
        eq(Duration::from_secs(1))
    );
    assert_that!(settings.lifecycle.stop_timeout(), none());
    assert_that!(settings.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_settings_file_when_load_then_uses_file_values() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(
        temp.path().join("warden.toml"),
        r#"
            [http]
            port = 9090

            [paths]
            worlds_dir = "/srv/worlds"
            start_script = "run.sh"

            [lifecycle]
            startup_timeout_secs = 30
            stop_timeout_secs = 15
        "#,
    )
    .unwrap();

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(settings.http.port, eq(9090));
    assert_that!(settings.paths.worlds_dir, eq(&PathBuf::from("/srv/worlds")));
    assert_that!(settings.paths.start_script.as_str(), eq("run.sh"));
    assert_that!(settings.lifecycle.startup_timeout_secs, eq(30));
    assert_that!(
        settings.lifecycle.stop_timeout(),
        some(eq(Duration::from_secs(15)))
    );
}

#[test]
#[serial]
fn given_malformed_settings_file_when_load_then_error() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(temp.path().join("warden.toml"), "[http\nport = ").unwrap();

    // When
    let result = Settings::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_port_env_when_load_then_port_wins_over_file_and_vh_var() {
    // Given
    let (temp, _guards) = setup_config_dir();
    std::fs::write(temp.path().join("warden.toml"), "[http]\nport = 9090").unwrap();
    let _vh_port = EnvGuard::set("VH_HTTP_PORT", "9191");
    let _port = EnvGuard::set("PORT", "8181");

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(settings.http.port, eq(8181));
    assert_that!(settings.bind_addr().as_str(), eq("0.0.0.0:8181"));
}

#[test]
#[serial]
fn given_relative_paths_when_load_then_resolved_against_config_dir() {
    // Given
    let (temp, _guards) = setup_config_dir();
    let _config_file = EnvGuard::set("VH_CONFIG_FILE", "state/config.json");

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(
        settings.paths.config_file,
        eq(&temp.path().join("state/config.json"))
    );
    assert_that!(settings.paths.log_file, eq(&temp.path().join("valheim.log")));
}

#[test]
#[serial]
fn given_script_names_when_script_paths_then_joined_to_server_dir() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _server_dir = EnvGuard::set("VH_SERVER_DIR", "/opt/valheim");

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(
        settings.paths.start_script_path(),
        eq(&PathBuf::from("/opt/valheim/start_server_bepinex.sh"))
    );
    assert_that!(
        settings.paths.update_script_path(),
        eq(&PathBuf::from("/opt/valheim/update.sh"))
    );
}

#[test]
#[serial]
fn given_invalid_log_level_env_when_load_then_defaults_to_info() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _level = EnvGuard::set("VH_LOG_LEVEL", "shouting");

    // When
    let settings = Settings::load().unwrap();

    // Then
    assert_that!(*settings.logging.level, eq(log::LevelFilter::Info));
}

// =========================================================================
// Validation
// =========================================================================

#[test]
#[serial]
fn given_zero_startup_timeout_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("VH_STARTUP_TIMEOUT_SECS", "0");

    // When
    let result = Settings::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_interval_longer_than_timeout_when_validate_then_error() {
    // Given
    let (_temp, _guards) = setup_config_dir();
    let _timeout = EnvGuard::set("VH_STARTUP_TIMEOUT_SECS", "2");
    let _interval = EnvGuard::set("VH_READINESS_INTERVAL_MS", "5000");

    // When
    let result = Settings::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}
