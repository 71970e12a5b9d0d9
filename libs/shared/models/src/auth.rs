use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ids::string_or_number;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Parses the one-line "street, city, STATE ZIP" form.
pub fn parse_address(value: &str) -> Option<Address> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    let mut state_zip = parts[2].split(' ');
    Some(Address {
        street: parts[0].to_string(),
        city: parts[1].to_string(),
        state: state_zip.next().unwrap_or_default().to_string(),
        zip_code: state_zip.next().unwrap_or_default().to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Parses the "name - phone" form, keeping the relationship already on file.
pub fn parse_emergency_contact(value: &str, current: &EmergencyContact) -> Option<EmergencyContact> {
    let parts: Vec<&str> = value.split(" - ").collect();
    if parts.len() < 2 {
        return None;
    }

    let relationship = if current.relationship.is_empty() {
        "Emergency Contact".to_string()
    } else {
        current.relationship.clone()
    };

    Some(EmergencyContact {
        name: parts[0].to_string(),
        phone: parts[1].to_string(),
        relationship,
    })
}

// Older rows keep address and emergency contact as free text.
fn address_or_text<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(parse_address(&text).unwrap_or(Address {
            street: text,
            ..Address::default()
        })),
        Value::Null => Ok(Address::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

fn emergency_contact_or_text<'de, D>(deserializer: D) -> Result<EmergencyContact, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(parse_emergency_contact(&text, &EmergencyContact::default()).unwrap_or(
            EmergencyContact {
                name: text,
                ..EmergencyContact::default()
            },
        )),
        Value::Null => Ok(EmergencyContact::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// The signed-in patient as held by the session. Never carries a password.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "address_or_text")]
    pub address: Address,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default, deserialize_with = "emergency_contact_or_text")]
    pub emergency_contact: EmergencyContact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A user row as stored by the backend, password included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub password: String,
}

impl UserRecord {
    pub fn without_password(self) -> User {
        self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_strips_password() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 1,
            "name": "Demo User",
            "email": "demo@healthcare.com",
            "password": "Demo123!"
        }))
        .unwrap();

        assert_eq!(record.password, "Demo123!");
        let user = record.without_password();
        assert_eq!(user.id, "1");

        let serialized = serde_json::to_value(&user).unwrap();
        assert!(serialized.get("password").is_none());
        assert_eq!(serialized["address"]["zipCode"], "");
    }

    #[test]
    fn test_text_address_and_contact_are_parsed() {
        let user: User = serde_json::from_value(json!({
            "id": "3",
            "address": "1 Elm St, Boston, MA 02110",
            "emergencyContact": "Jane - 555"
        }))
        .unwrap();

        assert_eq!(user.address.city, "Boston");
        assert_eq!(user.address.zip_code, "02110");
        assert_eq!(user.emergency_contact.name, "Jane");
        assert_eq!(user.emergency_contact.phone, "555");
        assert_eq!(user.emergency_contact.relationship, "Emergency Contact");
    }

    #[test]
    fn test_unstructured_text_is_kept() {
        let user: User = serde_json::from_value(json!({
            "id": "4",
            "address": "Somewhere",
            "emergencyContact": null
        }))
        .unwrap();

        assert_eq!(user.address.street, "Somewhere");
        assert_eq!(user.emergency_contact, EmergencyContact::default());
    }
}
