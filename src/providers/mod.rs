mod twitch;

pub use twitch::TwitchAdapter;
