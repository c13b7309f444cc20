//! Report prompt templates
//!
//! Templates are organized into:
//! - `system`: the system instruction framing the model
//! - `user`: the instruction block wrapped around the raw market data
//!
//! Both are compiled once into a MiniJinja environment held by
//! [`ReportPrompts`] and rendered fresh for every request.

mod system;
mod user;

pub use system::REPORT_SYSTEM;
pub use user::REPORT_USER;

use crate::error::Result;
use crate::tickers::ticker_list;
use minijinja::{Environment, context};
use report_llm::Message;

/// Compiled report templates
#[derive(Debug)]
pub struct ReportPrompts {
    env: Environment<'static>,
}

impl ReportPrompts {
    /// Compile the system and user templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(REPORT_SYSTEM, system::REPORT_SYSTEM_TEMPLATE)?;
        env.add_template(REPORT_USER, user::REPORT_USER_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the two-message prompt for one block of market data
    ///
    /// The user message embeds the raw data verbatim and the ticker list
    /// derived from it, trimmed of surrounding whitespace.
    pub fn messages(&self, data: &str) -> Result<Vec<Message>> {
        let system = self.env.get_template(REPORT_SYSTEM)?.render(context! {})?;
        let user = self.env.get_template(REPORT_USER)?.render(context! {
            data => data,
            tickers => ticker_list(data),
        })?;

        Ok(vec![
            Message::system(system.trim()),
            Message::user(user.trim()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_llm::Role;

    #[test]
    fn test_two_messages_in_order() {
        let prompts = ReportPrompts::new().unwrap();
        let messages = prompts.messages("AAPL,100\nMSFT,200").unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].text(),
            Some("You are a professional stock report generator.")
        );
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_user_message_layout() {
        let prompts = ReportPrompts::new().unwrap();
        let messages = prompts.messages("AAPL,100\nMSFT,200").unwrap();
        let user = messages[1].text().unwrap();

        assert!(user.starts_with("AAPL,100\nMSFT,200\n\n---\n\n### Instructions:"));
        assert!(user.contains("1. **Overview** – Brief summary of the stock's performance."));
        assert!(user.contains("5. **Conclusion** – Final assessment and outlook."));
        assert!(user.contains("Stock Report for: **AAPL, MSFT**"));
        assert!(user.ends_with("Begin the report below:"));
    }

    #[test]
    fn test_data_is_not_escaped() {
        let prompts = ReportPrompts::new().unwrap();
        let messages = prompts.messages("<b>AMZN</b>,\"1\" & 2").unwrap();
        let user = messages[1].text().unwrap();

        assert!(user.starts_with("<b>AMZN</b>,\"1\" & 2"));
        assert!(user.contains("Stock Report for: **<b>AMZN</b>**"));
    }
}
