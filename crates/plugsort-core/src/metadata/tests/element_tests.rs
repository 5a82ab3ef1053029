use crate::metadata::{File, Location, Message, MessageType, PluginCleaningData, Tag};

#[test]
fn test_location_scalar_form() -> Result<(), serde_yaml::Error> {
    let location: Location = serde_yaml::from_str("https://example.com/mod")?;
    assert_eq!(location, Location::new("https://example.com/mod"));

    let yaml = serde_yaml::to_string(&location)?;
    assert_eq!(yaml.trim(), "https://example.com/mod");
    Ok(())
}

#[test]
fn test_location_map_form() -> Result<(), serde_yaml::Error> {
    let location: Location = serde_yaml::from_str("link: https://example.com/mod\nname: Mod Page\n")?;
    assert_eq!(location, Location::with_name("https://example.com/mod", "Mod Page"));

    let yaml = serde_yaml::to_string(&location)?;
    assert!(yaml.contains("link: https://example.com/mod"));
    assert!(yaml.contains("name: Mod Page"));
    Ok(())
}

#[test]
fn test_location_sequence_is_rejected() {
    let result: Result<Location, _> = serde_yaml::from_str("- https://example.com/mod\n");
    assert!(result.is_err(), "A sequence is not a valid location");
}

#[test]
fn test_tag_forms() -> Result<(), serde_yaml::Error> {
    let tags: Vec<Tag> = serde_yaml::from_str(
        "- Relev\n- -Delev\n- name: Names\n  condition: 'file(\"A.esp\")'\n",
    )?;
    assert_eq!(tags[0], Tag::addition("Relev"));
    assert_eq!(tags[1], Tag::removal("Delev"));
    assert_eq!(tags[2], Tag::addition("Names").with_condition("file(\"A.esp\")"));

    let yaml = serde_yaml::to_string(&tags[1])?;
    assert_eq!(yaml.trim(), "-Delev");
    Ok(())
}

#[test]
fn test_file_forms() -> Result<(), serde_yaml::Error> {
    let files: Vec<File> = serde_yaml::from_str(
        "- A.esp\n- name: B.esp\n  display: Plugin B\n  condition: 'active(\"C.esp\")'\n",
    )?;
    assert_eq!(files[0], File::new("a.ESP"));
    assert_eq!(files[1].display_name(), "Plugin B");
    assert_eq!(files[1].condition.as_deref(), Some("active(\"C.esp\")"));
    assert_eq!(files[1].to_string(), "Plugin B");
    Ok(())
}

#[test]
fn test_message_with_substitutions() -> Result<(), serde_yaml::Error> {
    let message: Message = serde_yaml::from_str(
        "type: warn\ncontent: 'Requires {0} and {1}.'\nsubs: [ 'A.esp', 'B.esp' ]\n",
    )?;
    assert_eq!(message.message_type, MessageType::Warn);
    assert_eq!(
        message.content_for("en").map(|c| c.text.as_str()),
        Some("Requires A.esp and B.esp.")
    );
    assert_eq!(message.condition, None);
    Ok(())
}

#[test]
fn test_message_localized_content() -> Result<(), serde_yaml::Error> {
    let message: Message = serde_yaml::from_str(
        "type: say\ncontent:\n  - text: Hello\n    lang: en\n  - text: Bonjour\n    lang: fr\n",
    )?;
    assert_eq!(message.content_for("fr").map(|c| c.text.as_str()), Some("Bonjour"));
    assert_eq!(message.content_for("de").map(|c| c.text.as_str()), Some("Hello"));
    Ok(())
}

#[test]
fn test_message_rejects_empty_content() {
    let result: Result<Message, _> = serde_yaml::from_str("type: say\ncontent: []\n");
    assert!(result.is_err());
}

#[test]
fn test_content_for_message_built_without_content() -> Result<(), serde_yaml::Error> {
    let mut message = Message::new(MessageType::Error, "Broken");
    message.content.clear();
    assert_eq!(message.content_for("en"), None);

    // Serializing the empty message must not panic either
    let yaml = serde_yaml::to_string(&message)?;
    assert!(yaml.contains("content: []"));
    Ok(())
}

#[test]
fn test_cleaning_data_crc_forms() -> Result<(), serde_yaml::Error> {
    let records: Vec<PluginCleaningData> = serde_yaml::from_str(
        "- crc: 0x3DF29C82\n  util: xEdit\n  itm: 4\n- crc: '3DF29C82'\n  util: xEdit\n  udr: 2\n  nav: 1\n",
    )?;
    assert_eq!(records[0].crc, 0x3DF29C82);
    assert_eq!(records[0].itm_count, 4);
    assert_eq!(records[1].crc, 0x3DF29C82);
    assert_eq!(records[1].deleted_reference_count, 2);
    assert_eq!(records[1].deleted_navmesh_count, 1);
    Ok(())
}
