// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use crate::{get_cmd_output, ms_noise_weights};

#[test]
fn test_curves_no_stderr() {
    let cmd = ms_noise_weights().args(["curves", "--data"]).ok();
    assert!(cmd.is_ok(), "curves failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("meerkat-l-band-v1"));
    assert!(stdout.contains("1711.0 MHz"));
}
