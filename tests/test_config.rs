use httpframe::config::{CONFIG_PATH_ENV, Config, PORT_ENV, ServerConfig};

#[test]
fn test_config_defaults() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 42069);
    assert_eq!(cfg.initial_buffer_size, 8);
    assert_eq!(cfg.listen_addr(), "127.0.0.1:42069");
}

#[test]
fn test_config_from_full_yaml() {
    let cfg = Config::from_yaml(
        "server:\n  host: 0.0.0.0\n  port: 3000\n  initial_buffer_size: 1024\n",
    )
    .unwrap();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.server.initial_buffer_size, 1024);
    assert_eq!(cfg.server.listen_addr(), "0.0.0.0:3000");
}

#[test]
fn test_config_partial_yaml_uses_defaults() {
    let cfg = Config::from_yaml("server:\n  port: 8000\n").unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 8000);
    assert_eq!(cfg.server.initial_buffer_size, 8);
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("server:\n  initial_buffer_size: 0\n").is_err());
}

#[test]
fn test_config_rejects_bad_port() {
    assert!(Config::from_yaml("server:\n  port: not-a-port\n").is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}

// Env vars are process-wide, so every env-dependent case lives in this one test.
#[test]
fn test_config_load_from_env() {
    let path = std::env::temp_dir().join(format!("httpframe-test-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  host: 0.0.0.0\n  port: 5000\n").unwrap();

    unsafe {
        std::env::remove_var(CONFIG_PATH_ENV);
        std::env::remove_var(PORT_ENV);
    }
    assert_eq!(Config::load().unwrap(), Config::default());

    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, &path);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr(), "0.0.0.0:5000");

    unsafe {
        std::env::set_var(PORT_ENV, "6000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr(), "0.0.0.0:6000");

    unsafe {
        std::env::set_var(PORT_ENV, "not-a-port");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.port, 5000);

    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, path.with_extension("missing"));
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var(CONFIG_PATH_ENV);
        std::env::remove_var(PORT_ENV);
    }
    let _ = std::fs::remove_file(&path);
}
