use std::{env, str::FromStr};

/// Parse an `envvar` as `T`. Return `None` if env missing or parsing fails.
pub fn parse_env<T: FromStr>(envvar: &str) -> Option<T> {
    env::var(envvar).ok().and_then(|s| T::from_str(&s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env() {
        env::set_var("EMBLEM_TEST_PARSE_ENV", "42");
        assert_eq!(parse_env::<u64>("EMBLEM_TEST_PARSE_ENV"), Some(42));

        env::set_var("EMBLEM_TEST_PARSE_ENV_BAD", "forty-two");
        assert_eq!(parse_env::<u64>("EMBLEM_TEST_PARSE_ENV_BAD"), None);

        assert_eq!(parse_env::<u64>("EMBLEM_TEST_PARSE_ENV_UNSET"), None);
    }
}
