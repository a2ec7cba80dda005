mod layout;
mod table;

use crate::tui::app::Screen;
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, screen: &Screen) {
    table::draw_table(f, screen);
    if screen.help_open() {
        table::draw_help(f);
    }
}
