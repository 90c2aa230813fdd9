use crate::auth::{Credentials, TokenKeys, DEMO_USERNAME};
use crate::config::AppConfig;

pub fn handle(config: &AppConfig) -> anyhow::Result<()> {
    let keys = TokenKeys::new(&config.security.secret);
    let token = keys.issue_token(&Credentials {
        username: Some(DEMO_USERNAME.to_string()),
        password: None,
    })?;
    println!("{}", token);
    Ok(())
}
