use panelkit::{init_logging, run};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    run(std::env::args().skip(1))
}
