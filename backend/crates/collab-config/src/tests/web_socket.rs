use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_read_timeout_not_above_write_timeout_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _read = EnvGuard::set("COLLAB_WS_READ_TIMEOUT_SECS", "10");
    let _write = EnvGuard::set("COLLAB_WS_WRITE_TIMEOUT_SECS", "10");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_send_buffer_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("COLLAB_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_tiny_max_message_size_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _size = EnvGuard::set("COLLAB_WS_MAX_MESSAGE_SIZE", "16");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_read_timeout_above_max_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _read = EnvGuard::set("COLLAB_WS_READ_TIMEOUT_SECS", "601");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_boundary_values_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("COLLAB_WS_SEND_BUFFER_SIZE", "1");
    let _read = EnvGuard::set("COLLAB_WS_READ_TIMEOUT_SECS", "2");
    let _write = EnvGuard::set("COLLAB_WS_WRITE_TIMEOUT_SECS", "1");
    let _size = EnvGuard::set("COLLAB_WS_MAX_MESSAGE_SIZE", "512");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
