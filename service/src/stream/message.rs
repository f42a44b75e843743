use thiserror::Error;
use uuid::Uuid;

use crate::model::person::Person;

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Cannot decode person payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Envelope carried by the in-process binder
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub destination: String,
    /// Partition key, the person's email
    pub key: String,
    /// Person as JSON
    pub payload: Vec<u8>,
}

impl Message {
    pub fn from_person(destination: &str, person: &Person) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            destination: destination.to_string(),
            key: person.email.clone(),
            payload: serde_json::to_vec(person)?,
        })
    }

    pub fn person(&self) -> Result<Person, MessageError> {
        decode_person(&self.payload)
    }
}

pub fn decode_person(payload: &[u8]) -> Result<Person, MessageError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_person_json() {
        let person = Person::new_test();

        let message = Message::from_person("person", &person).unwrap();

        assert_eq!(message.destination, "person");
        assert_eq!(message.key, person.email);
        assert_eq!(message.person().unwrap(), person);

        let json: serde_json::Value = serde_json::from_slice(&message.payload).unwrap();
        assert_eq!(json["firstName"], "Edsger");
    }

    #[test]
    fn each_message_gets_its_own_id() {
        let person = Person::new_test();

        let first = Message::from_person("person", &person).unwrap();
        let second = Message::from_person("person", &person).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn decoding_garbage_fails() {
        let result = decode_person(b"not json");

        assert!(matches!(result, Err(MessageError::Decode(_))));
    }

    #[test]
    fn decodes_payload_from_another_producer() {
        let payload = br#"{"email": "james.watt@company.com", "firstName": "James", "lastName": "Watt", "yearBirth": 1736 }"#;

        let person = decode_person(payload).unwrap();

        assert_eq!(
            person,
            Person::new("james.watt@company.com", "James", "Watt", 1736)
        );
    }
}
