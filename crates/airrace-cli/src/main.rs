mod command;
mod input;
mod logging;
mod model;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
