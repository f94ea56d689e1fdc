//! `spot` — the interactive gap-buffered text editor (§6 "Editor CLI").
//!
//! Grounded on `apps/spot/spot.c`'s main key-dispatch loop (813 lines):
//! this binary implements the subset of bindings the external interface
//! actually documents (plain editing, arrow motion, `^x` prefix commands,
//! `Esc !` buffer kill) rather than the full original keymap, per
//! DESIGN.md's note on `spot`'s scope.

use anyhow::{Context, Result};
use clap::Parser;
use delimtools::gapbuf::{GapBuf, GapBufRing};
use delimtools::tui::{read_key, Key, Screen};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spot", about = "A small gap-buffered text editor")]
struct Cli {
    /// Files to open. With none, starts with a single empty buffer.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut ring = GapBufRing::new();
    if cli.files.is_empty() {
        ring.push(GapBuf::with_default_size());
    } else {
        for path in &cli.files {
            let buf = if path.exists() {
                GapBuf::load_file(path).with_context(|| format!("opening {}", path.display()))?
            } else {
                let mut b = GapBuf::with_default_size();
                b.set_filename(path);
                b
            };
            ring.push(buf);
        }
        ring.select(0);
    }

    let mut screen = Screen::new()?;
    let result = run_editor(&mut screen, &mut ring);
    screen.close()?;
    result
}

fn run_editor(screen: &mut Screen, ring: &mut GapBufRing) -> Result<()> {
    loop {
        draw(screen, ring)?;
        let key = read_key()?;
        match key {
            Key::Ctrl('x') => {
                let key2 = read_key()?;
                match key2 {
                    Key::Ctrl('s') => {
                        if let Some(b) = ring.current_mut() {
                            b.write_file()?;
                        }
                    }
                    Key::Ctrl('c') => return Ok(()),
                    Key::Left => ring.prev(),
                    Key::Right => ring.next(),
                    _ => {}
                }
            }
            Key::Esc => {
                let key2 = read_key()?;
                if key2 == Key::Char('!') {
                    ring.remove_current();
                    if ring.is_empty() {
                        return Ok(());
                    }
                }
            }
            Key::Enter => {
                if let Some(b) = ring.current_mut() {
                    b.insert_ch(b'\n', 1)?;
                }
            }
            Key::Backspace => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.backspace_ch(1);
                }
            }
            Key::Delete => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.delete_ch(1);
                }
            }
            Key::Left => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.move_left(1);
                }
            }
            Key::Right => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.move_right(1);
                }
            }
            Key::Up => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.up_line(1);
                }
            }
            Key::Down => {
                if let Some(b) = ring.current_mut() {
                    let _ = b.down_line(1);
                }
            }
            Key::Home => {
                if let Some(b) = ring.current_mut() {
                    b.start_of_line();
                }
            }
            Key::End => {
                if let Some(b) = ring.current_mut() {
                    b.end_of_line();
                }
            }
            Key::Char(c) if c.is_ascii() => {
                if let Some(b) = ring.current_mut() {
                    b.insert_ch(c as u8, 1)?;
                }
            }
            _ => {}
        }
    }
}

fn draw(screen: &mut Screen, ring: &GapBufRing) -> Result<()> {
    screen.erase().ok();
    screen.move_cursor(0, 0).ok();
    if let Some(b) = ring.current() {
        screen.print_str(&b.to_bytes());
    }
    screen.refresh()?;
    Ok(())
}
