use super::*;
use pretty_assertions::assert_eq;

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_owned())
    }
}

#[test]
fn defaults() {
    let config = GcConfig::default();
    assert_eq!(config.objects_threshold, 10_000);
    assert_eq!(config.bytes_threshold, 1_048_576);
    assert_eq!(config.max_bytes, 0);
    assert_eq!(config.policy, ThresholdPolicy::Adaptive);
}

#[test]
fn builders_clamp_thresholds() {
    let config = GcConfig::default()
        .with_objects_threshold(0)
        .with_bytes_threshold(0)
        .with_max_bytes(0);
    assert_eq!(config.objects_threshold, 1);
    assert_eq!(config.bytes_threshold, 1);
    assert_eq!(config.max_bytes, 0);
}

#[test]
fn policy_parses_case_insensitively() {
    assert_eq!("static".parse(), Ok(ThresholdPolicy::Static));
    assert_eq!(" Adaptive ".parse(), Ok(ThresholdPolicy::Adaptive));
    assert_eq!(
        "eager".parse::<ThresholdPolicy>(),
        Err(UnknownPolicy("eager".to_owned()))
    );
    assert_eq!(ThresholdPolicy::Static.to_string(), "static");
}

#[test]
fn unknown_policy_message() {
    assert_eq!(
        UnknownPolicy("x".to_owned()).to_string(),
        "unknown threshold policy `x` (expected `static` or `adaptive`)"
    );
}

#[test]
fn reads_every_variable() {
    let vars = [
        (OBJECTS_THRESHOLD_VAR, "16"),
        (BYTES_THRESHOLD_VAR, "4096"),
        (MAX_BYTES_VAR, "65536"),
        (POLICY_VAR, "static"),
    ];
    let config = GcConfig::from_lookup(lookup(&vars));
    assert_eq!(
        config,
        GcConfig {
            objects_threshold: 16,
            bytes_threshold: 4096,
            max_bytes: 65536,
            policy: ThresholdPolicy::Static,
        }
    );
}

#[test]
fn ignores_unparseable_values() {
    let vars = [
        (OBJECTS_THRESHOLD_VAR, "lots"),
        (BYTES_THRESHOLD_VAR, "-1"),
        (POLICY_VAR, "sometimes"),
    ];
    assert_eq!(GcConfig::from_lookup(lookup(&vars)), GcConfig::default());
}

#[test]
fn zero_threshold_from_env_is_clamped() {
    let vars = [(OBJECTS_THRESHOLD_VAR, "0")];
    assert_eq!(GcConfig::from_lookup(lookup(&vars)).objects_threshold, 1);
}
