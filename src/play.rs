//! # 挑战模式的交互循环
//!
//! 逐行读取玩家输入，直到 `quit` 或输入结束：
//! - 表达式：提交答案，答对后自动发下一手牌；
//! - `hint`：显示当前挑战的解法预览；
//! - `new`：放弃当前挑战，重新发牌；
//! - `quit`：结束并显示总分。
//!
//! 输入输出都是泛型的，命令行传入 stdin/stdout，测试传入内存缓冲。

use std::io::{self, BufRead, Write};

use chrono::Local;
use rand::Rng;

use crate::card::Card;
use crate::errors::SessionError;
use crate::session::GameSession;

const INSTRUCTIONS: &str = "Type an expression that uses all four cards, or `hint`, `new`, `quit`.";

/// 运行挑战循环；`session` 应已处于挑战模式。
pub fn run_challenge_loop<R, I, W>(
    session: &mut GameSession,
    rng: &mut R,
    input: I,
    out: &mut W,
) -> io::Result<()>
where
    R: Rng + ?Sized,
    I: BufRead,
    W: Write,
{
    writeln!(out, "{INSTRUCTIONS}")?;
    write_cards(session, out)?;

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "hint" => write!(out, "{}", session.preview())?,
            "new" => next_round(session, rng, out)?,
            answer => {
                log::debug!("submitted {answer:?}");
                // 答对后计时会被清空，先取下用时
                let timer = session.timer_label(Local::now());
                let ready = session.ready_to_submit(answer);
                match session.submit_answer(answer) {
                    Ok(value) => {
                        writeln!(
                            out,
                            "Correct! {answer} = {value} (time {timer}, score {})",
                            session.score()
                        )?;
                        next_round(session, rng, out)?;
                    }
                    Err(SessionError::Validation(e)) => {
                        let verdict = if ready { "Wrong" } else { "Incomplete" };
                        writeln!(out, "{verdict}: {}", e.display_detailed())?;
                    }
                    Err(e) => writeln!(out, "Error: {}", e.display_detailed())?,
                }
            }
        }
    }

    writeln!(out, "Final score: {}", session.score())
}

fn next_round<R, W>(session: &mut GameSession, rng: &mut R, out: &mut W) -> io::Result<()>
where
    R: Rng + ?Sized,
    W: Write,
{
    match session.new_challenge(rng) {
        Ok(_) => write_cards(session, out),
        Err(e) => writeln!(out, "Error: {}", e.display_detailed()),
    }
}

fn write_cards<W: Write>(session: &GameSession, out: &mut W) -> io::Result<()> {
    let cards = session.challenge_cards();
    if cards.is_empty() {
        return writeln!(out, "No challenge in progress.");
    }
    let shown: Vec<String> = cards.iter().map(Card::to_string).collect();
    writeln!(out, "Cards: {}", shown.join(" "))?;
    if session.solutions().is_empty() {
        writeln!(out, "(this hand has no solution, type `new` for another)")?;
    }
    Ok(())
}
