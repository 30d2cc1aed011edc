//! BOXTREE_* environment overrides.
//!
//! Kept in its own test binary: the variables are process-wide.

use std::env;

use boxtree::application::{ApplicationError, SortOrder};
use boxtree::config::Settings;

#[test]
fn given_env_vars_when_load_then_override_and_reject_bad_values() {
    env::set_var("BOXTREE_MAX_DEPTH", "4");
    env::set_var("BOXTREE_DIRS_FIRST", "true");
    env::set_var("BOXTREE_SORT", "none");
    env::set_var("BOXTREE_EXCLUDE", "^target$,^dist$");

    let settings = Settings::load_with(None, None).expect("load");
    assert_eq!(settings.max_depth, Some(4));
    assert!(settings.dirs_first);
    assert_eq!(settings.sort, SortOrder::Unsorted);
    assert_eq!(
        settings.exclude,
        vec!["^target$".to_string(), "^dist$".to_string()]
    );

    env::set_var("BOXTREE_ON_ERROR", "explode");
    let result = Settings::load_with(None, None);
    assert!(matches!(result, Err(ApplicationError::Config { .. })));

    env::remove_var("BOXTREE_ON_ERROR");
    env::set_var("BOXTREE_MAX_DEPTH", "abc");
    let result = Settings::load_with(None, None);
    assert!(
        matches!(result, Err(ApplicationError::Config { ref message }) if message.contains("BOXTREE_MAX_DEPTH")),
        "{result:?}"
    );

    env::set_var("BOXTREE_MAX_DEPTH", "4");
    env::set_var("BOXTREE_SHOW_HIDDEN", "maybe");
    let result = Settings::load_with(None, None);
    assert!(
        matches!(result, Err(ApplicationError::Config { ref message }) if message.contains("BOXTREE_SHOW_HIDDEN")),
        "{result:?}"
    );

    for key in [
        "BOXTREE_SHOW_HIDDEN",
        "BOXTREE_MAX_DEPTH",
        "BOXTREE_DIRS_FIRST",
        "BOXTREE_SORT",
        "BOXTREE_EXCLUDE",
        "BOXTREE_ON_ERROR",
    ] {
        env::remove_var(key);
    }
}
