use duct::cmd;

pub fn test_on_host() -> anyhow::Result<()> {
    cmd!("cargo", "clippy", "--", "-C", "panic=abort").run()?;
    cmd!("cargo", "test", "--lib", "--package", "bootmenu-rs-core").run()?;
    Ok(())
}
