use std::{env, error::Error, process::Command, str::from_utf8};

fn main() -> Result<(), Box<dyn Error>> {
    let rustc = env::var("RUSTC")?;

    let rustc_version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|result| result.status.success())
        .ok_or("failed to query rustc version")?;

    println!(
        "cargo:rustc-env=LINENV_VERSION={}",
        env::var("CARGO_PKG_VERSION")?
    );
    println!(
        "cargo:rustc-env=LINENV_RUSTC_VERSION={}",
        from_utf8(rustc_version.stdout.as_slice())?.trim()
    );
    println!("cargo:rustc-env=LINENV_PROFILE={}", env::var("PROFILE")?);

    Ok(())
}
