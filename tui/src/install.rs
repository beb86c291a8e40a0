//! Install Action
//!
//! Copies the running binary into a system directory and marks it
//! executable. Failures are reported on the console and returned as `false`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{info, warn};

/// Default install directory
pub const INSTALL_DIR: &str = "/usr/local/bin";

/// Installed binary name
pub const INSTALL_NAME: &str = "textdisplay";

/// Install the running executable as `target/name`
pub fn install(target: &Path, name: &str) -> bool {
    match std::env::current_exe() {
        Ok(exe) => install_from(&exe, target, name),
        Err(e) => {
            warn!(error = %e, "Cannot locate running executable");
            not_installed();
            false
        }
    }
}

/// Install `binary` as `target/name`
pub fn install_from(binary: &Path, target: &Path, name: &str) -> bool {
    if !target.is_dir() {
        println!("{} is not a directory.\n", target.display());
        return false;
    }

    let dest = target.join(name);
    let result = fs::copy(binary, &dest).and_then(|_| {
        let mut perms = fs::metadata(&dest)?.permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(&dest, perms)
    });

    match result {
        Ok(()) => {
            info!(path = %dest.display(), "Installed");
            println!("Installed to {} as {}.\n", target.display(), name);
            true
        }
        Err(e) => {
            warn!(error = %e, path = %dest.display(), "Install failed");
            not_installed();
            false
        }
    }
}

fn not_installed() {
    println!("Not installed.");
    // SAFETY: getuid has no preconditions and cannot fail
    if unsafe { libc::getuid() } != 0 {
        println!("Is sudo required?\n");
    }
}
