// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Embeds git metadata for `cfglayer version`. A build outside a git
//! checkout still succeeds; the version simply omits the commit.

use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .fail_on_error()
        .emit()
        .or_else(|_| {
            println!("cargo:warning=git metadata unavailable, building without it");
            Ok::<(), Box<dyn std::error::Error>>(())
        })?;
    Ok(())
}
