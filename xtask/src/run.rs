use duct::cmd;

/// The UEFI target the application is run on.
const TARGET: &str = "x86_64-unknown-uefi";

pub fn run_bootmenu(
    ovmf_code: Option<&str>,
    release: bool,
    add_file: Option<&str>,
) -> anyhow::Result<()> {
    let profile = if release { "release-lto" } else { "dev" };
    let out_dir = if release { "release-lto" } else { "debug" };
    let image = format!("target/{TARGET}/{out_dir}/bootmenu-rs.efi");

    cmd!("cargo", "install", "uefi-run").run()?; // skipped by cargo when already installed
    cmd!(
        "cargo",
        "build",
        "--bin",
        "bootmenu-rs",
        "--target",
        TARGET,
        "--profile",
        profile
    )
    .run()?;

    let mut run_args = vec!["-d"];
    run_args.extend(ovmf_code.map(|path| ["-b", path]).into_iter().flatten());
    run_args.extend(add_file.map(|path| ["-f", path]).into_iter().flatten());
    run_args.push(&image);

    cmd("uefi-run", run_args).run().map_err(|e| {
        anyhow::anyhow!("{e}\nhint: pass --ovmf-code if the firmware image could not be found")
    })?;
    Ok(())
}
