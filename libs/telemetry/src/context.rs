/// Labels attached to every span and counter emitted for a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryLabels {
    pub platform: String,
    pub conversation_id: Option<String>,
    pub kind: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl TelemetryLabels {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Label pairs for metric recorders. The conversation id is left out to keep metric
    /// cardinality bounded; it only ever goes on spans.
    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags = Vec::with_capacity(2 + self.extra.len());
        tags.push(("platform".into(), self.platform.clone()));
        if let Some(kind) = &self.kind {
            tags.push(("kind".into(), kind.clone()));
        }
        for (key, value) in &self.extra {
            tags.push((key.clone(), value.clone()));
        }
        tags
    }
}

#[derive(Debug, Clone)]
pub struct MessageContext {
    pub labels: TelemetryLabels,
}

impl MessageContext {
    pub fn new(labels: TelemetryLabels) -> Self {
        Self { labels }
    }
}
