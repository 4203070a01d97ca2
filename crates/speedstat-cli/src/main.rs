mod analysis;
mod chart;
mod command;
mod config;
mod report;
mod session;

fn main() -> anyhow::Result<()> {
    command::run()
}
