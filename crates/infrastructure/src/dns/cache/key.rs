use hickory_proto::op::Message;

/// Question identity used as the cache key: lower-cased name, type, class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: String,
    pub record_type: u16,
    pub dns_class: u16,
}

impl CacheKey {
    #[inline]
    pub fn new(name: &str, record_type: u16, dns_class: u16) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            record_type,
            dns_class,
        }
    }

    /// Key for a single-question message. Messages with zero or several
    /// questions are never cached.
    pub fn from_query(message: &Message) -> Option<Self> {
        let [query] = message.queries() else {
            return None;
        };

        Some(Self::new(
            &query.name().to_ascii(),
            u16::from(query.query_type()),
            u16::from(query.query_class()),
        ))
    }
}
