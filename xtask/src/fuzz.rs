use clap::Subcommand;
use duct::cmd;

#[derive(Subcommand)]
pub enum Fuzz {
    /// Run the load option decoder
    LoadOption,

    /// Run the BootOrder decoder
    BootOrder,

    /// Run the device path node walker
    DevicePath,
}

pub fn fuzz_decoders(command: Fuzz) -> anyhow::Result<()> {
    let mut args = vec!["fuzz", "run"];
    match command {
        Fuzz::LoadOption => args.push("load_option"),
        Fuzz::BootOrder => args.push("boot_order"),
        Fuzz::DevicePath => args.push("device_path"),
    }

    cmd!("cargo", "install", "cargo-fuzz").run()?; // will not install if its already installed
    cmd("cargo", args).run()?;
    Ok(())
}
