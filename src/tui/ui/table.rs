use crate::agents::Decision;
use crate::cards::Card;
use crate::participant::Participant;
use crate::tui::app::{Prompt, Screen};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

const LOG_LINES: usize = 6;

pub(super) fn draw_table(f: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                      // header
            Constraint::Length(5),                      // board
            Constraint::Min(8),                         // seats
            Constraint::Length(LOG_LINES as u16 + 2),   // log + prompt
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(format!(
        "Hand {}   Street: {}   Pot: {}   Bet to match: {}",
        screen.hand, screen.street, screen.pot, screen.highest_bet
    )))
    .block(Block::default().title("poker-rounds").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_board(f, chunks[1], screen);
    draw_seats(f, chunks[2], screen);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    draw_log(f, bottom[0], screen);
    draw_prompt(f, bottom[1], screen);
}

fn draw_board(f: &mut Frame, area: Rect, screen: &Screen) {
    f.render_widget(Block::default().title("Board").borders(Borders::ALL), area);
    for (i, slot) in columns(inner(area), 5).into_iter().enumerate() {
        render_card(f, slot, screen.community.get(i).copied(), None);
    }
}

fn draw_seats(f: &mut Frame, area: Rect, screen: &Screen) {
    let total = screen.seats.len();
    if total == 0 {
        let para = Paragraph::new("Waiting for the first deal...")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(para, area);
        return;
    }
    // Two rows once the table gets crowded.
    let per_row = if total > 4 { total.div_ceil(2) } else { total };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if total > per_row {
            vec![Constraint::Percentage(50), Constraint::Percentage(50)]
        } else {
            vec![Constraint::Percentage(100)]
        })
        .split(area);
    for (seat, p) in screen.seats.iter().enumerate() {
        let cols = columns(rows[seat / per_row], per_row);
        draw_seat(f, cols[seat % per_row], screen, seat, p);
    }
}

fn draw_seat(f: &mut Frame, area: Rect, screen: &Screen, seat: usize, p: &Participant) {
    let mut title = format!("{} [{}]", p.name(), p.strategy());
    if p.is_all_in() {
        title.push_str(" [ALL-IN]");
    }
    if matches!(screen.prompt, Prompt::Decision { seat: s, .. } if s == seat) {
        title.push_str(" [Act]");
    }
    let winner = screen.result.as_ref().and_then(|r| r.winner) == Some(seat);
    let color = if winner {
        Some(Color::Green)
    } else if p.is_folded() {
        Some(Color::DarkGray)
    } else if seat == screen.human_seat {
        Some(Color::Cyan)
    } else {
        None
    };
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if let Some(c) = color {
        block = block.border_style(Style::default().fg(c));
    }
    f.render_widget(block, area);

    let status = if p.is_folded() {
        "Folded"
    } else if p.is_all_in() {
        "All-in"
    } else {
        "In"
    };
    let lines = vec![
        Line::from(format!("Stack: {}", p.stack())),
        Line::from(format!("Bet: {}  Hand: {}", p.contribution(), p.contributed())),
        Line::from(format!("Status: {status}")),
    ];
    let body = inner(area);
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(body);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), split[0]);

    if let Some(hole) = p.hole() {
        let slots = columns(split[1], 2);
        let shown = screen.reveals(seat);
        for (slot, card) in slots.into_iter().zip(hole.as_array()) {
            if shown {
                render_card(f, slot, Some(card), Some(Color::Cyan));
            } else {
                render_back(f, slot);
            }
        }
    }
}

fn draw_log(f: &mut Frame, area: Rect, screen: &Screen) {
    let lines: Vec<Line> = screen.log_recent(LOG_LINES).map(Line::from).collect();
    let para = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_prompt(f: &mut Frame, area: Rect, screen: &Screen) {
    let mut lines: Vec<Line> = Vec::new();
    match &screen.prompt {
        Prompt::Decision { to_call, offered, .. } => {
            lines.push(Line::from(Span::styled(
                format!("Your turn. To call: {to_call}"),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let keys: Vec<String> = offered.iter().map(|d| action_key(*d, *to_call)).collect();
            lines.push(Line::from(keys.join(" • ")));
        }
        Prompt::PlayAgain => {
            if let Some(r) = &screen.result {
                lines.push(Line::from(r.message.clone()));
            }
            lines.push(Line::from("Play another hand? (Y/N)"));
        }
        _ => match &screen.result {
            Some(r) => lines.push(Line::from(r.message.clone())),
            None => lines.push(Line::from("Waiting for the other players...")),
        },
    }
    if let Some(notice) = screen.notice() {
        lines.push(Line::from(Span::styled(notice.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "? help • Q quit",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Action").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn action_key(d: Decision, to_call: u64) -> String {
    match d {
        Decision::Fold => "F fold".to_string(),
        Decision::Call if to_call == 0 => "C check".to_string(),
        Decision::Call => format!("C call {to_call}"),
        Decision::Raise(by) => format!("R raise +{by}"),
        Decision::AllIn => "A all-in".to_string(),
    }
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Your turn:", bold)),
        Line::from("- F: fold"),
        Line::from("- C: call / check"),
        Line::from("- R: raise by the table's raise step"),
        Line::from("- A: all-in"),
        Line::from(""),
        Line::from(Span::styled("After a hand:", bold)),
        Line::from("- Y / N: play again or stop"),
        Line::from(""),
        Line::from("- Q or Esc: quit"),
        Line::from("Close help: ?"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title("Help").borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn render_card(f: &mut Frame, area: Rect, card: Option<Card>, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(block, area);
    let content = match card {
        Some(c) => {
            let fg = if c.suit().is_red() { Color::Red } else { Color::White };
            Line::from(Span::styled(
                format!("{}{}", c.rank().label(), c.suit().symbol()),
                Style::default().fg(fg),
            ))
        }
        None => Line::from("[  ]"),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner(area));
}

fn render_back(f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(block, area);
    f.render_widget(Paragraph::new("##").alignment(Alignment::Center), inner(area));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use crate::hand::HoleCards;
    use crate::participant::Strategy;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(screen: &Screen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| super::super::draw(f, screen)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn seated() -> Screen {
        let mut screen = Screen::new(0);
        let hole = HoleCards::try_new(
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Spades),
        )
        .unwrap();
        let mut you = Participant::new("You", Strategy::Interactive, 990);
        you.hole = Some(hole);
        let mut bot = Participant::new("Bot Cautious", Strategy::Cautious, 990);
        bot.hole = Some(
            HoleCards::try_new(Card::new(Rank::King, Suit::Clubs), Card::new(Rank::Two, Suit::Clubs))
                .unwrap(),
        );
        screen.seats = vec![you, bot];
        screen
    }

    #[test]
    fn only_the_human_hand_is_face_up() {
        let text = render(&seated());
        assert!(text.contains("10♥"));
        assert!(text.contains("A♠"));
        assert!(!text.contains("K♣"));
        assert!(text.contains("Bot Cautious"));
    }

    #[test]
    fn play_again_prompt_is_shown() {
        let mut screen = seated();
        screen.begin_play_again();
        let text = render(&screen);
        assert!(text.contains("Play another hand? (Y/N)"));
    }

    #[test]
    fn action_labels() {
        assert_eq!(action_key(Decision::Call, 0), "C check");
        assert_eq!(action_key(Decision::Call, 40), "C call 40");
        assert_eq!(action_key(Decision::Raise(50), 40), "R raise +50");
    }
}
