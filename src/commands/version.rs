use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("pcie-exporter version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
