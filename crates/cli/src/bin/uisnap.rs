use anyhow::Result;

fn main() -> Result<()> {
    uisnap_cli::main_entry()
}
