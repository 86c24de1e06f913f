use crate::value_objects::{ParticipantName, Timestamp};

/// 房间内的一个在线参与者。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Participant {
    pub name: ParticipantName,
    pub last_seen: Timestamp,
}

impl Participant {
    pub fn join(name: ParticipantName, now: Timestamp) -> Self {
        Self {
            name,
            last_seen: now,
        }
    }

    /// 刷新心跳；迟到的旧时间戳不会让 `last_seen` 倒退。
    pub fn touch(&mut self, at: Timestamp) {
        if at > self.last_seen {
            self.last_seen = at;
        }
    }

    pub fn is_stale(&self, threshold: Timestamp) -> bool {
        self.last_seen <= threshold
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn touch_only_moves_forward() {
        let now = Utc::now();
        let mut participant = Participant::join(ParticipantName::parse("Alice").unwrap(), now);

        participant.touch(now + Duration::seconds(5));
        participant.touch(now + Duration::seconds(2));

        assert_eq!(participant.last_seen, now + Duration::seconds(5));
    }

    #[test]
    fn staleness_includes_threshold() {
        let now = Utc::now();
        let participant = Participant::join(ParticipantName::parse("Bob").unwrap(), now);

        assert!(participant.is_stale(now));
        assert!(participant.is_stale(now + Duration::milliseconds(1)));
        assert!(!participant.is_stale(now - Duration::milliseconds(1)));
    }
}
