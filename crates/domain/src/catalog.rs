//! Static service catalog — which actions and reactions exist.
//!
//! Consumed by the (out-of-scope) management UI and used by the daemon's
//! wiring test to verify the hook registry stays in 1:1 correspondence
//! with the advertised (service, kind) pairs.

use serde::Serialize;

/// One hook (action or reaction) a service exposes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HookDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// Config keys the hook expects; `?`-suffixed keys are optional.
    pub config_fields: &'static [&'static str],
}

/// One external service with its actions and reactions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub actions: &'static [HookDescriptor],
    pub reactions: &'static [HookDescriptor],
}

/// The full catalog, in registry order.
#[must_use]
pub fn catalog() -> &'static [ServiceDescriptor] {
    CATALOG
}

/// All (service, kind) action pairs in the catalog.
pub fn action_pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG
        .iter()
        .flat_map(|s| s.actions.iter().map(|a| (s.name, a.name)))
}

/// All (service, kind) reaction pairs in the catalog.
pub fn reaction_pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG
        .iter()
        .flat_map(|s| s.reactions.iter().map(|r| (s.name, r.name)))
}

const CATALOG: &[ServiceDescriptor] = &[
    ServiceDescriptor {
        name: "timer",
        actions: &[
            HookDescriptor {
                name: "time_reached",
                description: "Fires once per day when the clock passes a time of day",
                config_fields: &["hour", "minute"],
            },
            HookDescriptor {
                name: "date_reached",
                description: "Fires on a specific calendar date",
                config_fields: &["date"],
            },
            HookDescriptor {
                name: "day_of_week",
                description: "Fires on a given weekday (0=Sunday..6=Saturday)",
                config_fields: &["day_of_week"],
            },
        ],
        reactions: &[],
    },
    ServiceDescriptor {
        name: "gmail",
        actions: &[HookDescriptor {
            name: "new_email",
            description: "Fires when a new message lands in the inbox",
            config_fields: &[],
        }],
        reactions: &[HookDescriptor {
            name: "send_email",
            description: "Sends a plain-text email",
            config_fields: &["to", "subject", "body"],
        }],
    },
    ServiceDescriptor {
        name: "spotify",
        actions: &[HookDescriptor {
            name: "new_saved_track",
            description: "Fires when a track is saved to the library",
            config_fields: &[],
        }],
        reactions: &[
            HookDescriptor {
                name: "skip_track",
                description: "Skips to the next track on the active device",
                config_fields: &[],
            },
            HookDescriptor {
                name: "play_playlist",
                description: "Starts playback of a playlist",
                config_fields: &["playlist_uri"],
            },
        ],
    },
    ServiceDescriptor {
        name: "youtube",
        actions: &[HookDescriptor {
            name: "new_video",
            description: "Fires when a channel uploads a new video",
            config_fields: &["channel"],
        }],
        reactions: &[
            HookDescriptor {
                name: "like_video",
                description: "Rates a video with a like",
                config_fields: &["video_id?", "url?"],
            },
            HookDescriptor {
                name: "add_to_playlist",
                description: "Appends a video to a playlist",
                config_fields: &["playlist_id", "video_id?", "url?"],
            },
            HookDescriptor {
                name: "post_comment",
                description: "Posts a top-level comment on a video",
                config_fields: &["url?", "video_id?", "comment"],
            },
        ],
    },
    ServiceDescriptor {
        name: "github",
        actions: &[],
        reactions: &[
            HookDescriptor {
                name: "create_issue",
                description: "Opens an issue on a repository",
                config_fields: &["repo_owner", "repo_name", "title", "body?"],
            },
            HookDescriptor {
                name: "add_comment",
                description: "Comments on a specific or the most recent issue",
                config_fields: &["repo_owner", "repo_name", "issue_option", "issue_number?", "comment"],
            },
        ],
    },
    ServiceDescriptor {
        name: "discord",
        actions: &[],
        reactions: &[HookDescriptor {
            name: "send_webhook_message",
            description: "Posts a message through a channel webhook",
            config_fields: &["webhook_url", "message", "username?"],
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_list_six_services() {
        assert_eq!(catalog().len(), 6);
    }

    #[test]
    fn should_expose_six_action_pairs() {
        assert_eq!(action_pairs().count(), 6);
    }

    #[test]
    fn should_expose_nine_reaction_pairs() {
        assert_eq!(reaction_pairs().count(), 9);
    }

    #[test]
    fn should_not_contain_duplicate_pairs() {
        let mut seen = std::collections::HashSet::new();
        for pair in action_pairs() {
            assert!(seen.insert(pair), "duplicate action pair: {pair:?}");
        }
        seen.clear();
        for pair in reaction_pairs() {
            assert!(seen.insert(pair), "duplicate reaction pair: {pair:?}");
        }
    }

    #[test]
    fn should_serialize_catalog_for_the_management_ui() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert_eq!(json[0]["name"], "timer");
        assert_eq!(json[0]["actions"][0]["config_fields"][0], "hour");
    }
}
