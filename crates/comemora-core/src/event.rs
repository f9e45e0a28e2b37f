// Event domain types
//
// An Event is a yearly-recurring occasion (birthday, anniversary, work
// milestone...). Only `day` and `month` take part in recurrence matching;
// `year` is carried for display and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Storage-assigned identifier. `0` means the event was never saved.
pub type EventId = i64;

/// Placeholder replaced by the event name in default templates
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Kind of occasion. Drives the default message template.
///
/// Tags outside the known set are kept verbatim in `Custom` so they survive
/// storage and CSV transfer; they render with the `Other` template.
///
/// Build values from tags with `From<&str>`. Equality and hashing compare
/// tags, so a `Custom` holding a known tag still equals the named variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Birthday,
    Wedding,
    Dating,
    Pet,
    Work,
    Bereavement,
    #[default]
    Other,
    /// Tag outside the named variants
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Birthday => "aniversario",
            EventType::Wedding => "casamento",
            EventType::Dating => "namoro",
            EventType::Pet => "pet",
            EventType::Work => "trabalho",
            EventType::Bereavement => "luto",
            EventType::Other => "outro",
            EventType::Custom(tag) => tag,
        }
    }

    /// Same type with a known tag held in `Custom` mapped to its variant
    pub fn canonical(&self) -> Self {
        EventType::from(self.as_str())
    }

    /// Default message template for this type
    pub fn default_template(&self) -> &'static str {
        match self.canonical() {
            EventType::Birthday => "Feliz Aniversário! {name} 🎈🍰🎁 Que seja um dia inesquecível e o início de um novo ano na sua vida cheio de felicidade e muitas realizações. 😘❤️",
            EventType::Wedding => "Feliz Aniversário de Casamento! {name} 💍💑 Que o amor de vocês continue crescendo a cada dia!",
            EventType::Work => "Parabéns pelo tempo de casa! {name} 🚀 Obrigado por fazer parte da nossa jornada.",
            EventType::Dating => "Feliz dia do nosso amor! {name} ❤️",
            EventType::Pet => "Parabéns para o nosso pet querido! {name} 🐾🦴",
            EventType::Bereavement => "Hoje lembramos com carinho de {name}. 🖤",
            EventType::Other | EventType::Custom(_) => "Olá {name}, hoje é um dia especial! 🎉",
        }
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EventType {}

impl std::hash::Hash for EventType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "aniversario" => EventType::Birthday,
            "casamento" => EventType::Wedding,
            "namoro" => EventType::Dating,
            "pet" => EventType::Pet,
            "trabalho" => EventType::Work,
            "luto" => EventType::Bereavement,
            "outro" => EventType::Other,
            other => EventType::Custom(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        EventType::from(s.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Custom(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Channel used to deliver a notification
///
/// Like `EventType`, compared by tag: `Unsupported("SMS")` equals `Sms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationChannel {
    #[default]
    Email,
    Teams,
    WhatsApp,
    Sms,
    /// Tag outside the supported set; dispatching to it fails
    Unsupported(String),
}

impl NotificationChannel {
    /// Same channel with a known tag held in `Unsupported` mapped to its variant
    pub fn canonical(&self) -> Self {
        NotificationChannel::from(self.as_str())
    }

    pub fn as_str(&self) -> &str {
        match self {
            NotificationChannel::Email => "Email",
            NotificationChannel::Teams => "Teams",
            NotificationChannel::WhatsApp => "WhatsApp",
            NotificationChannel::Sms => "SMS",
            NotificationChannel::Unsupported(tag) => tag,
        }
    }
}

impl PartialEq for NotificationChannel {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for NotificationChannel {}

impl std::hash::Hash for NotificationChannel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NotificationChannel {
    fn from(s: &str) -> Self {
        match s {
            "Email" => NotificationChannel::Email,
            "Teams" => NotificationChannel::Teams,
            "WhatsApp" => NotificationChannel::WhatsApp,
            "SMS" => NotificationChannel::Sms,
            other => NotificationChannel::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for NotificationChannel {
    fn from(s: String) -> Self {
        NotificationChannel::from(s.as_str())
    }
}

impl From<NotificationChannel> for String {
    fn from(c: NotificationChannel) -> Self {
        match c {
            NotificationChannel::Unsupported(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// A recurring occasion and how to notify about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    #[serde(default)]
    pub id: EventId,
    #[cfg_attr(feature = "openapi", schema(example = "Ana"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = 15))]
    pub day: u32,
    #[cfg_attr(feature = "openapi", schema(example = 6))]
    pub month: u32,
    /// 0 when unknown
    #[serde(default)]
    pub year: i32,
    #[serde(rename = "type", default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "aniversario"))]
    pub event_type: EventType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "Email"))]
    pub preferred_channel: NotificationChannel,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "ana@example.com"))]
    pub contact_destination: String,
    #[serde(default)]
    pub custom_message: String,
    #[serde(default)]
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create an unsaved event
    pub fn new(name: impl Into<String>, day: u32, month: u32, event_type: EventType) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            day,
            month,
            year: 0,
            event_type,
            tags: Vec::new(),
            preferred_channel: NotificationChannel::default(),
            contact_destination: String::new(),
            custom_message: String::new(),
            is_important: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Set the delivery channel and its destination
    pub fn with_channel(
        mut self,
        channel: NotificationChannel,
        destination: impl Into<String>,
    ) -> Self {
        self.preferred_channel = channel;
        self.contact_destination = destination.into();
        self
    }

    pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = message.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn important(mut self, is_important: bool) -> Self {
        self.is_important = is_important;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Recurrence match: day and month only, year ignored
    pub fn occurs_on(&self, day: u32, month: u32) -> bool {
        self.day == day && self.month == month
    }

    /// Message delivered for this event.
    ///
    /// A non-empty custom message is returned as-is, without placeholder
    /// substitution. Otherwise the type's template is used with every
    /// `{name}` replaced by the event name.
    pub fn render_content(&self) -> String {
        if !self.custom_message.is_empty() {
            return self.custom_message.clone();
        }
        self.event_type
            .default_template()
            .replace(NAME_PLACEHOLDER, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birthday_template() {
        let event = Event::new("Ana", 15, 6, EventType::Birthday);
        let content = event.render_content();
        assert!(content.starts_with("Feliz Aniversário! Ana 🎈🍰🎁"));
        assert!(!content.contains(NAME_PLACEHOLDER));
    }

    #[test]
    fn test_every_known_type_substitutes_name() {
        let types = [
            EventType::Birthday,
            EventType::Wedding,
            EventType::Dating,
            EventType::Pet,
            EventType::Work,
            EventType::Bereavement,
            EventType::Other,
        ];
        for event_type in types {
            let content = Event::new("Rex", 1, 1, event_type.clone()).render_content();
            assert!(content.contains("Rex"), "{} missing name", event_type);
            assert!(!content.contains(NAME_PLACEHOLDER));
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_other() {
        let event = Event::new("Bia", 2, 3, EventType::from("formatura"));
        assert_eq!(event.render_content(), "Olá Bia, hoje é um dia especial! 🎉");
    }

    #[test]
    fn test_substitution_is_single_pass() {
        let event = Event::new("{name}", 2, 3, EventType::Other);
        assert_eq!(
            event.render_content(),
            "Olá {name}, hoje é um dia especial! 🎉"
        );
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        let event = Event::new("Caio", 2, 3, EventType::Birthday)
            .with_custom_message("Parabéns, {name}!");
        assert_eq!(event.render_content(), "Parabéns, {name}!");
    }

    #[test]
    fn test_occurs_on_ignores_year() {
        let event = Event::new("Ana", 15, 6, EventType::Birthday).with_year(1990);
        assert!(event.occurs_on(15, 6));
        assert!(!event.occurs_on(16, 6));
        assert!(!event.occurs_on(15, 7));
    }

    #[test]
    fn test_type_and_channel_tags() {
        assert_eq!(EventType::from("trabalho"), EventType::Work);
        assert_eq!(EventType::from("luto").to_string(), "luto");
        assert_eq!(
            EventType::from("xyz"),
            EventType::Custom("xyz".to_string())
        );
        assert_eq!(NotificationChannel::from("SMS"), NotificationChannel::Sms);
        assert_eq!(NotificationChannel::Sms.to_string(), "SMS");
        assert_eq!(
            NotificationChannel::from("Pigeon").to_string(),
            "Pigeon"
        );
    }

    #[test]
    fn test_custom_holding_known_tag_behaves_as_known_variant() {
        let pet = EventType::Custom("pet".to_string());
        assert_eq!(pet, EventType::Pet);
        assert!(matches!(pet.canonical(), EventType::Pet));
        assert_eq!(pet.default_template(), EventType::Pet.default_template());
        assert_eq!(String::from(pet), "pet");

        let mut seen = std::collections::HashSet::new();
        seen.insert(EventType::Pet);
        assert!(!seen.insert(EventType::Custom("pet".to_string())));

        let sms = NotificationChannel::Unsupported("SMS".to_string());
        assert_eq!(sms, NotificationChannel::Sms);
        assert!(matches!(sms.canonical(), NotificationChannel::Sms));
        assert_ne!(
            NotificationChannel::Unsupported("sms".to_string()),
            NotificationChannel::Sms
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event = Event::new("Ana", 15, 6, EventType::Birthday)
            .with_channel(NotificationChannel::WhatsApp, "+5511999999999")
            .important(true);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "aniversario");
        assert_eq!(json["preferred_channel"], "WhatsApp");
        assert_eq!(json["is_important"], true);
        assert_eq!(json["year"], 0);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
