// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use super::*;

#[test]
fn test_arg_file_types() {
    assert_eq!(*ARG_FILE_TYPES_COMMA_SEPARATED, "toml, json");
    assert!(matches!(ArgFileTypes::from_str("toml"), Ok(ArgFileTypes::Toml)));
    assert!(matches!(ArgFileTypes::from_str("json"), Ok(ArgFileTypes::Json)));
    assert!(ArgFileTypes::from_str("yaml").is_err());
}

#[test]
fn test_help_texts_list_the_choices() {
    assert!(STAT_HELP.contains("sum, stddev"));
    assert!(SMOOTH_HELP.contains("polynomial, spline"));
    assert!(BUILTIN_CURVE_HELP.contains("meerkat-l-band-v1"));
    assert!(FIT_ORDER_HELP.ends_with("Default: 9"));
    assert!(SENSITIVITY_HELP.contains("csv"));
}
