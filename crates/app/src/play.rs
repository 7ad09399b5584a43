//! Terminal front end: play one session on stdin/stdout, or print the dashboard.

use services::sessions::LOAD_FAILED_MESSAGE;
use services::{AppServices, RunnerEvent, Topic};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use wonder_core::Resolution;

type Input = Lines<BufReader<Stdin>>;

/// Warn at these remaining-second marks instead of printing every tick.
fn should_announce(remaining: u32) -> bool {
    remaining > 0 && (remaining % 10 == 0 || remaining <= 5)
}

/// Run `topic` to completion. An answer is the option number; `q` quits.
pub async fn play(services: &AppServices, topic: Topic) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading {topic}…");
    let (control, mut events) = services.start(topic).split();
    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();
    let mut options: Vec<String> = Vec::new();
    let mut awaiting_next = false;

    loop {
        tokio::select! {
            event = events.next_event() => {
                let Some(event) = event else { break };
                match event {
                    RunnerEvent::Presented(q) => {
                        awaiting_next = false;
                        println!();
                        println!("Question {} of {} ({}s)", q.index + 1, q.total, q.seconds);
                        if let Some(specimen) = &q.specimen {
                            println!("[image: {}]", specimen.image_path);
                        }
                        println!("{}", q.prompt);
                        for (n, option) in q.options.iter().enumerate() {
                            println!("  {}) {option}", n + 1);
                        }
                        options = q.options;
                    }
                    RunnerEvent::Tick { remaining } if should_announce(remaining) => {
                        println!("  ⏱ {remaining}s left");
                    }
                    RunnerEvent::Tick { .. } => {}
                    RunnerEvent::Answered { outcome, score } => {
                        awaiting_next = true;
                        let verdict = match (&outcome.resolution, outcome.correct) {
                            (Resolution::TimedOut, _) => "⏰ Time's up!",
                            (_, true) => "✅ Correct!",
                            (_, false) => "❌ Not quite.",
                        };
                        println!("{verdict} Correct answer: {} (score {score})", outcome.correct_answer);
                        println!("Press Enter to continue.");
                    }
                    RunnerEvent::Finished { result: Some(result), recorded } => {
                        println!();
                        println!(
                            "Correct: {}/{} ({}%)",
                            result.score(),
                            result.total(),
                            result.percent()
                        );
                        if !recorded {
                            println!("This result could not be saved.");
                        }
                    }
                    RunnerEvent::Finished { result: None, .. } => println!("{LOAD_FAILED_MESSAGE}"),
                    RunnerEvent::Rejected(reason) => println!("  ({reason})"),
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    let _ = control.cancel();
                    break;
                };
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    let _ = control.cancel();
                    println!("Session abandoned. Nothing was recorded.");
                    break;
                } else if awaiting_next {
                    control.advance()?;
                } else if let Some(option) = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                {
                    control.select(option.clone())?;
                } else {
                    println!("  Type an option number, or q to quit.");
                }
            }
        }
    }
    Ok(())
}

pub async fn print_history(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let history = services.history();
    let stats = history.dashboard().await?;
    if stats.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    println!("Sessions:      {}", stats.total_sessions);
    println!("Average score: {}%", stats.average_percent);
    println!("Best category: {}", stats.best_category);
    println!("Perfect score: {}", if stats.perfect_score { "yes" } else { "not yet" });

    for group in &stats.breakdown {
        println!();
        println!("{}", group.activity);
        for totals in &group.categories {
            println!(
                "  {:<20} {:>3}/{:<3} {:>3}%",
                totals.category,
                totals.score,
                totals.total,
                totals.percent()
            );
        }
    }

    println!();
    for item in history.list_items().await? {
        let when = item
            .completed_at
            .map_or_else(|| "—".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{when}  {:<14} {:<18} {}/{}",
            item.activity, item.category, item.score, item.total
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announces_tens_and_final_seconds() {
        let marks: Vec<u32> = (0..=30).rev().filter(|s| should_announce(*s)).collect();
        assert_eq!(marks, vec![30, 20, 10, 5, 4, 3, 2, 1]);
    }
}
