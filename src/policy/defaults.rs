//! Built-in settings and addresses.

/// Default settings file name, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "setting.yaml";

/// Opened at startup when `CheckUpdate` is enabled.
pub const RELEASES_URL: &str = "https://github.com/YukiYukiVirtual/OpenBrowserServer/releases/";

/// Starter settings written by `openbrowser init`.
/// Only `https` links to a handful of video and social sites, one per second.
pub const STARTER_SETTINGS: &str = r#"# openbrowser settings
# Each list item goes on its own line, starting with "-".
# A line without "-" ends the list.

# Open the releases page at startup
CheckUpdate: true

# Minimum milliseconds between two opened URLs
IdlePeriod: 1000

# URL schemes that may be opened
Protocol:
 - https
 - vrchat

# Hosts that may be opened (subdomains included)
Domain:
 - youtube.com
 - youtu.be
 - twitter.com
 - x.com
 - vrchat.com
 - github.com
"#;
