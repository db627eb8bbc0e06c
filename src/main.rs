// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;

use ms_noise_weights::{MsNoise, MsNoiseError};

fn main() {
    // Print the Display form of errors rather than what returning a Result
    // from main would print (the Debug form).
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), MsNoiseError> {
    MsNoise::parse().run()
}
