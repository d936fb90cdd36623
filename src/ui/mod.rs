// ui/mod.rs

pub mod constants;
mod game;
mod main_menu;
mod mystery;
pub mod spinner;
pub mod textarea;
pub mod utils;

use crate::app::{App, Screen};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Style},
    widgets::Paragraph,
};

use constants::{MIN_HEIGHT, MIN_WIDTH};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();
    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small. Please resize.")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(warning, size);
        return;
    }

    match app.screen {
        Screen::MainMenu => main_menu::draw_main_menu(f, app),
        Screen::Interrogation => game::draw_interrogation(f, app),
        Screen::Mystery => mystery::draw_mystery(f, app),
    }
}
