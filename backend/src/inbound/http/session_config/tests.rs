//! Session environment validation in debug and release modes.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn env_with(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create key file");
    file.write_all(&vec![b'k'; len]).expect("write key file");
    file
}

#[fixture]
fn long_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key.path().display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_a_complete_environment(long_key: NamedTempFile) {
    let env = env_with(release_vars(&long_key));

    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key_source, KeySource::File);
}

#[rstest]
fn file_keys_are_stable_across_loads(long_key: NamedTempFile) {
    let first = session_settings_from_env(&env_with(release_vars(&long_key)), BuildMode::Release)
        .expect("first load");
    let second = session_settings_from_env(&env_with(release_vars(&long_key)), BuildMode::Release)
        .expect("second load");

    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(long_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&long_key);
    vars.remove(missing);

    let result = session_settings_from_env(&env_with(vars), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name }) if name == missing
    ));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_malformed_toggles(
    long_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(&long_key);
    vars.insert(name, value.to_owned());

    let result = session_settings_from_env(&env_with(vars), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: reported, .. }) if reported == name
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys(long_key: NamedTempFile) {
    let mut vars = release_vars(&long_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    let result = session_settings_from_env(&env_with(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);

    let result = session_settings_from_env(&env_with(release_vars(&short)), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_fails_when_the_key_file_is_missing(long_key: NamedTempFile) {
    let mut vars = release_vars(&long_key);
    vars.insert(KEY_FILE_ENV, "/nonexistent/barberbook/session_key".to_owned());

    let result = session_settings_from_env(&env_with(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookies(long_key: NamedTempFile) {
    let mut vars = release_vars(&long_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let result = session_settings_from_env(&env_with(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let vars = HashMap::from([(KEY_FILE_ENV, "/nonexistent/barberbook/session_key".to_owned())]);

    let settings =
        session_settings_from_env(&env_with(vars), BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.key_source, KeySource::Ephemeral);
}

#[rstest]
fn debug_replaces_short_keys() {
    let short = key_file(16);
    let vars = HashMap::from([(KEY_FILE_ENV, short.path().display().to_string())]);

    let settings =
        session_settings_from_env(&env_with(vars), BuildMode::Debug).expect("debug settings");

    assert_eq!(settings.key_source, KeySource::Ephemeral);
}

#[rstest]
#[case("lax", SameSite::Lax)]
#[case("STRICT", SameSite::Strict)]
#[case("None", SameSite::None)]
fn same_site_is_case_insensitive(
    long_key: NamedTempFile,
    #[case] raw: &str,
    #[case] expected: SameSite,
) {
    let mut vars = release_vars(&long_key);
    vars.insert(SAMESITE_ENV, raw.to_owned());

    let settings =
        session_settings_from_env(&env_with(vars), BuildMode::Release).expect("valid settings");

    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn release_reads_the_process_environment(long_key: NamedTempFile) {
    let path = long_key.path().display().to_string();
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path.as_str())),
        (COOKIE_SECURE_ENV, Some("1")),
        (SAMESITE_ENV, Some("Lax")),
        (ALLOW_EPHEMERAL_ENV, Some("0")),
    ]);

    let settings = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Release)
        .expect("process environment is complete");

    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.key_source, KeySource::File);
}
