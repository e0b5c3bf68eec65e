use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jsonxml::{
    Config, FromValue, IndentConfig, Object, Result, ToValue, Value, XmlManager,
};

#[derive(Debug, Clone, PartialEq)]
struct User {
    name: String,
    age: u32,
    emails: Vec<String>,
    greeting: Option<String>,
}

impl FromValue for User {
    fn from_value(value: Value) -> Result<Self> {
        let mut obj = Object::from_value(value)?;
        Ok(Self {
            name: obj.take("name")?,
            age: obj.take("age")?,
            emails: obj.take("emails")?,
            greeting: None,
        })
    }
}

impl ToValue for User {
    fn to_value(&self) -> Value {
        Value::Object(
            Object::new()
                .with("name", self.name.to_value())
                .with("age", self.age.to_value())
                .with("emails", self.emails.to_value()),
        )
    }

    fn root_name() -> Option<&'static str> {
        Some("User")
    }
}

fn stromgol() -> User {
    User {
        name: "Stromgol".to_string(),
        age: 42,
        emails: vec!["a@example.com".to_string(), "b@example.com".to_string()],
        greeting: None,
    }
}

#[test]
fn test_typed_pretty_output() {
    let manager = XmlManager::default();
    assert_eq!(
        manager.to_xml_typed(&stromgol(), true),
        "<User>\n\
         \x20   <name>Stromgol</name>\n\
         \x20   <age>42</age>\n\
         \x20   <emails isArray=\"true\">\n\
         \x20       <element>a@example.com</element>\n\
         \x20       <element>b@example.com</element>\n\
         \x20   </emails>\n\
         </User>\n"
    );
}

#[test]
fn test_typed_roundtrip() -> Result<()> {
    let manager = XmlManager::default();
    let xml = manager.to_xml_typed(&stromgol(), false);
    let user: User = manager.from_xml_to_type(&xml)?;
    assert_eq!(user, stromgol());
    Ok(())
}

#[test]
fn test_custom_indentation() {
    let manager = XmlManager::new(
        Config::default().with_indent(IndentConfig::new(2, "\r\n").with_trailing_newline(false)),
    );
    let value = Value::from(Object::new().with("someInt", 123));
    assert_eq!(
        manager.to_xml(&value, true),
        "<JsonObject>\r\n  <someInt>123</someInt>\r\n</JsonObject>"
    );
}

#[test]
fn test_post_construct_hook_on_every_typed_decode() -> Result<()> {
    let initialized = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&initialized);
    let manager = XmlManager::default().with_post_construct(move |item| {
        if let Some(user) = item.downcast_mut::<User>() {
            user.greeting = Some(format!("Hello {}", user.name));
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let xml = manager.to_xml_typed(&stromgol(), false);
    let user: User = manager.from_xml_to_type(&xml)?;
    assert_eq!(user.greeting.as_deref(), Some("Hello Stromgol"));

    let from_reader = manager.from_xml_reader(xml.as_bytes())?;
    let user = manager.from_xml_to_type_with(&manager.to_xml(&from_reader, true), |u: &mut User| {
        u.age += 1;
    })?;
    assert_eq!(user.age, 43);
    assert_eq!(user.greeting.as_deref(), Some("Hello Stromgol"));
    assert_eq!(initialized.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_single_email_is_still_a_list() -> Result<()> {
    let manager = XmlManager::default();
    let user: User = manager.from_xml_to_type(
        "<User><name>Solo</name><age>7</age><emails isArray=\"true\"><element>x@y.z</element></emails></User>",
    )?;
    assert_eq!(user.emails, vec!["x@y.z".to_string()]);
    Ok(())
}

#[test]
fn test_list_of_users() -> Result<()> {
    let manager = XmlManager::default();
    let xml = manager.to_xml_typed(&vec![stromgol(), stromgol()], false);
    assert!(xml.starts_with("<JsonArray isArray=\"true\"><element><obj><name>"));
    let users: Vec<User> = manager.from_xml_to_list(&xml)?;
    assert_eq!(users.len(), 2);
    Ok(())
}
