use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 22] = [
        "RUST_LOG",
        "HOST",
        "PORT",
        "DANA_ENV",
        "DANA_HOST",
        "DANA_SCHEME",
        "DANA_CLIENT_ID",
        "DANA_X_PARTNER_ID",
        "DANA_MERCHANT_ID",
        "DANA_MCC",
        "DANA_ORDER_TITLE",
        "DANA_MERCHANT_TRANS_TYPE",
        "DANA_BUYER_EXTERNAL_USER_ID",
        "DANA_BUYER_USER_ID",
        "DANA_BUYER_NICKNAME",
        "DANA_BUYER_EXTERNAL_USER_TYPE",
        "DANA_OS_TYPE",
        "DANA_WEBSITE_LANGUAGE",
        "DANA_CLIENT_IP",
        "DANA_ORIGIN",
        "DANA_DEBUG",
        "DANA_USER_AGENT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
