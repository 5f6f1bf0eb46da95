// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 ____  _   _ _   _ ____   _    ____
|  _ \| | | | \ | |  _ \ / \  |  _ \
| |_) | | | |  \| | |_) / _ \ | | | |
|  _ <| |_| | |\  |  __/ ___ \| |_| |
|_| \_\\___/|_| \_|_| /_/   \_\____/

    Write it, run it, read the output
"#;
    println!("{}", banner);
}
