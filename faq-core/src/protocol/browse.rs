use std::time::Instant;

use serde_json::{json, Value};

use super::{payload_str, required_str, Command};
use crate::error::{FaqError, Result};
use crate::services::browser::{BrowserEvent, BrowserState, Filter};
use crate::services::debounce::Debouncer;

fn view(state: &BrowserState) -> Value {
    serde_json::to_value(state.view()).unwrap_or(json!({}))
}

fn query_of(payload: &Value) -> String {
    payload
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

pub fn handle(
    state: &mut BrowserState,
    input: &mut Debouncer<String>,
    cmd: Command,
    payload: &Value,
) -> Result<Value> {
    match cmd {
        Command::BrowseQuery => {
            input.cancel();
            state.apply(BrowserEvent::SetQuery(query_of(payload)));
            Ok(view(state))
        }

        Command::BrowseInput => {
            input.push(query_of(payload), Instant::now());
            Ok(json!({ "pending": true }))
        }

        Command::BrowseTick => match input.poll(Instant::now()) {
            Some(q) => {
                state.apply(BrowserEvent::SetQuery(q));
                Ok(json!({ "pending": false, "fired": true, "view": view(state) }))
            }
            None => Ok(json!({ "pending": input.is_pending(), "fired": false })),
        },

        Command::BrowseFilter => {
            let filter = Filter::new(
                payload_str(payload, "category"),
                payload_str(payload, "subcategory"),
                payload_str(payload, "faqId"),
            );
            state.apply(BrowserEvent::Select(filter));
            Ok(view(state))
        }

        Command::BrowseJump => {
            let id = required_str(payload, "faqId")?;
            state.apply(BrowserEvent::Jump(id.to_string()));
            Ok(view(state))
        }

        Command::BrowseReset => {
            state.apply(BrowserEvent::ResetFilter);
            Ok(view(state))
        }

        Command::BrowseClear => {
            input.cancel();
            state.apply(BrowserEvent::ClearQuery);
            Ok(view(state))
        }

        Command::BrowseToggle => {
            let id = required_str(payload, "faqId")?;
            state.apply(BrowserEvent::Toggle(id.to_string()));
            Ok(view(state))
        }

        Command::BrowseExpandAll => {
            state.apply(BrowserEvent::ExpandAll);
            Ok(view(state))
        }

        Command::BrowseCollapseAll => {
            state.apply(BrowserEvent::CollapseAll);
            Ok(view(state))
        }

        Command::BrowseView => Ok(view(state)),

        Command::BrowseCopy => {
            let id = required_str(payload, "faqId")?;
            Ok(json!({ "text": state.solution_text(id)? }))
        }

        _ => Err(FaqError::BadRequest("unknown command".into())),
    }
}
