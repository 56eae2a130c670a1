// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Write;

use log::debug;
use log::info;
use studyloop_core::Quality;
use studyloop_core::Session;
use studyloop_core::Timestamp;

use crate::cmd::require_topic;
use crate::cmd::review::write_outcome;
use crate::db::Database;
use crate::error::Fallible;

const QUIT: &str = "q";

/// Run an interactive session over the due items of a topic. Every answer is
/// persisted as it is given. Returns the number of answers.
pub fn study(
    db: &mut Database,
    topic_id: &str,
    limit: Option<usize>,
    now: Timestamp,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Fallible<usize> {
    let topic = require_topic(db, topic_id)?;
    let mut session = Session::start(topic, now, limit);
    debug!("session over '{topic_id}' with {} items", session.total());
    if session.is_finished() {
        writeln!(out, "Nothing due in '{topic_id}'.")?;
        return Ok(0);
    }
    writeln!(
        out,
        "{} items due in '{topic_id}'. Rate each answer from 0 to 5, or enter {QUIT} to stop.",
        session.total()
    )?;
    while let Some(entry) = session.current() {
        let kind = entry.kind;
        let prompt = entry.item.prompt().to_string();
        let answer = entry.item.answer();
        writeln!(out)?;
        writeln!(out, "[{kind}] {prompt}")?;
        write!(out, "(enter to reveal) ")?;
        out.flush()?;
        match read_line(input)? {
            Some(line) if line != QUIT => {}
            _ => break,
        }
        writeln!(out, "Answer: {answer}")?;
        let Some(quality) = ask_quality(input, out)? else {
            break;
        };
        let (answered, state) = session.answer(quality, now)?;
        db.save_review(session.topic(), &answered, quality, &state, now)?;
        write_outcome(&state, out)?;
    }
    info!(
        "session over '{topic_id}' ended after {} reviews, {} remaining",
        session.reviewed(),
        session.remaining()
    );
    writeln!(out)?;
    writeln!(
        out,
        "Session complete: {} reviews, {} remaining.",
        session.reviewed(),
        session.remaining()
    )?;
    Ok(session.reviewed())
}

/// `None` on end of input.
fn read_line(input: &mut dyn BufRead) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt until a valid quality is entered. `None` on quit or end of input.
fn ask_quality(input: &mut dyn BufRead, out: &mut dyn Write) -> Fallible<Option<Quality>> {
    loop {
        write!(out, "Quality [0-5]: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line == QUIT {
            return Ok(None);
        }
        match Quality::try_from(line) {
            Ok(quality) => return Ok(Some(quality)),
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::helper::sample_topic;
    use crate::helper::ts;

    fn run(db: &mut Database, input: &str, limit: Option<usize>) -> Fallible<(usize, String)> {
        let now = ts("2024-06-15T12:00:00.000");
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let reviewed = study(db, "ownership", limit, now, &mut input, &mut out)?;
        Ok((reviewed, String::from_utf8(out).unwrap()))
    }

    fn seeded() -> Fallible<Database> {
        let mut db = Database::in_memory()?;
        db.put_topic(&sample_topic(ts("2024-06-15T12:00:00.000")))?;
        Ok(db)
    }

    #[test]
    fn test_failed_item_comes_back() -> Fallible<()> {
        let mut db = seeded()?;
        let (reviewed, text) = run(&mut db, "\n5\n\n1\n\n4\n\n4\n", None)?;
        assert_eq!(reviewed, 4);
        assert!(text.contains("Session complete: 4 reviews, 0 remaining."));
        assert_eq!(text.matches("How many mutable borrows").count(), 2);

        let topic = db.get_topic("ownership")?.unwrap();
        assert_eq!(topic.flashcards[1].review_state.repetitions, 1);
        assert_eq!(topic.flashcards[1].review_state.interval, 1);
        assert_eq!(db.reviews_for_topic("ownership")?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_invalid_quality_is_asked_again() -> Fallible<()> {
        let mut db = seeded()?;
        let (reviewed, text) = run(&mut db, "\n9\nfive\n5\n", Some(1))?;
        assert_eq!(reviewed, 1);
        assert!(text.contains("error: invalid quality 9: must be between 0 and 5"));
        assert!(text.contains("error: invalid quality string: five"));
        assert!(text.contains("Session complete: 1 reviews, 0 remaining."));
        Ok(())
    }

    #[test]
    fn test_quit_early() -> Fallible<()> {
        let mut db = seeded()?;
        let (reviewed, text) = run(&mut db, "\n5\nq\n", None)?;
        assert_eq!(reviewed, 1);
        assert!(text.contains("Session complete: 1 reviews, 2 remaining."));
        Ok(())
    }

    #[test]
    fn test_end_of_input() -> Fallible<()> {
        let mut db = seeded()?;
        let (reviewed, _) = run(&mut db, "", None)?;
        assert_eq!(reviewed, 0);
        assert!(db.reviews_for_topic("ownership")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_nothing_due() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        let mut topic = sample_topic(ts("2024-06-15T12:00:00.000"));
        topic.flashcards.clear();
        topic.fill_in_blanks.clear();
        db.put_topic(&topic)?;
        let (reviewed, text) = run(&mut db, "", None)?;
        assert_eq!(reviewed, 0);
        assert_eq!(text, "Nothing due in 'ownership'.\n");
        Ok(())
    }
}
