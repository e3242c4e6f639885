//
//  Sample application.
//
//  Lists a folder on a WebDAV share, like "ls -l".
//  cargo run --example davls -- -u user -p pass https://example.com/remote.php/webdav/ Documents/
//

use std::error::Error;

use clap::Parser;

use dav_client::DavClient;

#[derive(Debug, clap::Parser)]
#[command(about, version)]
struct Cli {
    /// base URL of the share
    url: String,
    /// folder to list, relative to the base URL
    #[arg(default_value = "")]
    folder: String,
    /// port to connect to
    #[arg(short = 'P', long)]
    port: Option<u16>,
    /// username
    #[arg(short, long)]
    user: Option<String>,
    /// password
    #[arg(short, long, default_value = "")]
    password: String,
    /// do not verify the server certificate
    #[arg(short = 'k', long)]
    insecure: bool,
    /// check whether this entry exists instead of listing
    #[arg(short, long)]
    exists: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let Cli {
        url,
        folder,
        port,
        user,
        password,
        insecure,
        exists,
    } = Cli::parse();

    let mut builder = DavClient::builder(url).ignore_tls(insecure);
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(user) = user {
        builder = builder.login(user, password);
    }
    let mut dav = builder.build()?;

    dav.read_contents(&folder)?;

    if let Some(href) = exists {
        let found = dav.does_content_exist(&href);
        println!("{}: {}", href, if found { "exists" } else { "not found" });
        if !found {
            std::process::exit(1);
        }
        return Ok(());
    }

    for entry in dav.contents() {
        let kind = if entry.is_dir { 'd' } else { '-' };
        let size = entry
            .size()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:>12} {:<31} {}",
            kind,
            size,
            entry.last_modified().unwrap_or("-"),
            entry.href
        );
    }
    Ok(())
}
