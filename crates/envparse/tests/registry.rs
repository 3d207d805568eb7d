use std::env;

use chrono::TimeDelta;
use envparse::{ErrorKind, Registry};

#[test]
fn resolves_process_environment() {
    // Safety: tests in this binary only access the environment through `std::env`, which
    // takes a lock around every access, and none of them call C code that reads it
    unsafe {
        env::set_var("ENVPARSE_REG_WORKERS", "16");
        env::set_var("ENVPARSE_REG_NAME", "primary");
        env::set_var("ENVPARSE_REG_GRACE", "1m30s");
        env::remove_var("ENVPARSE_REG_RETRIES");
    }

    let mut registry = Registry::new();
    let workers = registry.int("ENVPARSE_REG_WORKERS", 4);
    let name = registry.string("ENVPARSE_REG_NAME", "default");
    let grace = registry.duration("ENVPARSE_REG_GRACE", TimeDelta::seconds(10));
    let retries = registry.int("ENVPARSE_REG_RETRIES", 3);

    registry.parse().unwrap();

    assert_eq!(workers.get(), 16);
    assert_eq!(name.get(), "primary");
    assert_eq!(grace.get(), TimeDelta::seconds(90));
    assert_eq!(retries.get(), 3);
}

#[test]
fn reports_every_bad_variable() {
    // Safety: tests in this binary only access the environment through `std::env`, which
    // takes a lock around every access, and none of them call C code that reads it
    unsafe {
        env::set_var("ENVPARSE_REG_A", "bad");
        env::remove_var("ENVPARSE_REG_B");
    }

    let mut registry = Registry::new();
    let a = registry.int("ENVPARSE_REG_A", 1);
    let b = registry.int("ENVPARSE_REG_B", 2);

    let errors = registry.parse().unwrap_err();

    assert_eq!(errors.len(), 1);
    for err in &errors {
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.name(), "ENVPARSE_REG_A");
    }
    assert_eq!(a.get(), 1);
    assert_eq!(b.get(), 2);
}
