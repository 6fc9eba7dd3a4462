//! XML utilities for the WebDAV side of CalDAV.
//!
//! Generates PROPFIND request bodies and parses multistatus responses for
//! calendar discovery and event-resource listing.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use std::io::Cursor;

/// DAV namespace
pub const DAV_NS: &str = "DAV:";
/// CalDAV namespace
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";

/// A calendar collection discovered under a principal's calendar home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredCalendar {
    /// The collection's href (path on the server).
    pub href: String,
    /// The trailing path segment, used as the calendar identifier.
    pub calendar_id: String,
    /// The display name, when the server provides one.
    pub display_name: Option<String>,
}

/// Generates a PROPFIND body for calendar discovery.
///
/// Requests `displayname` and `resourcetype`, enough to tell calendar
/// collections apart from other members of the calendar home.
pub fn propfind_calendars_body() -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut propfind = BytesStart::new("d:propfind");
    propfind.push_attribute(("xmlns:d", DAV_NS));
    propfind.push_attribute(("xmlns:c", CALDAV_NS));
    writer.write_event(Event::Start(propfind)).unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("d:prop")))
        .unwrap();
    write_empty_element(&mut writer, "d:displayname");
    write_empty_element(&mut writer, "d:resourcetype");
    writer
        .write_event(Event::End(BytesEnd::new("d:prop")))
        .unwrap();

    writer
        .write_event(Event::End(BytesEnd::new("d:propfind")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Generates a PROPFIND body for listing the members of a collection.
pub fn propfind_members_body() -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut propfind = BytesStart::new("d:propfind");
    propfind.push_attribute(("xmlns:d", DAV_NS));
    writer.write_event(Event::Start(propfind)).unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("d:prop")))
        .unwrap();
    write_empty_element(&mut writer, "d:getetag");
    write_empty_element(&mut writer, "d:resourcetype");
    writer
        .write_event(Event::End(BytesEnd::new("d:prop")))
        .unwrap();

    writer
        .write_event(Event::End(BytesEnd::new("d:propfind")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Parses a calendar-home PROPFIND response into discovered calendars.
///
/// `request_path` is the path the PROPFIND was issued against; the
/// collection's own response entry is skipped so only members remain.
pub fn parse_calendar_home_response(xml: &str, request_path: &str) -> Vec<DiscoveredCalendar> {
    let mut calendars = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current_href: Option<String> = None;
    let mut current_displayname: Option<String> = None;
    let mut is_calendar = false;
    let mut in_response = false;
    let mut current_element: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local = local_name(&name);

                match local {
                    "response" => {
                        in_response = true;
                        current_href = None;
                        current_displayname = None;
                        is_calendar = false;
                    }
                    "href" | "displayname" => {
                        current_element = Some(local.to_string());
                    }
                    "calendar" => {
                        is_calendar = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let local = local_name(&name);

                if local == "response" && in_response {
                    if is_calendar
                        && let Some(href) = current_href.take()
                        && trim_slashes(&href) != trim_slashes(request_path)
                        && let Some(calendar_id) = trailing_segment(&href)
                    {
                        calendars.push(DiscoveredCalendar {
                            href,
                            calendar_id,
                            display_name: current_displayname.take(),
                        });
                    }
                    in_response = false;
                }
                current_element = None;
            }
            Ok(Event::Text(e)) => {
                if let Some(ref elem) = current_element {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match elem.as_str() {
                        "href" => current_href = Some(text),
                        "displayname" => current_displayname = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    calendars
}

/// Parses a collection PROPFIND response into the hrefs of its `.ics`
/// members.
pub fn parse_ics_hrefs(xml: &str) -> Vec<String> {
    let mut hrefs = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_href = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                in_href = local_name(&name) == "href";
            }
            Ok(Event::End(_)) => {
                in_href = false;
            }
            Ok(Event::Text(e)) => {
                if in_href {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if text.ends_with(".ics") {
                        hrefs.push(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    hrefs
}

/// Helper to write an empty XML element.
fn write_empty_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) {
    writer
        .write_event(Event::Empty(BytesStart::new(name)))
        .unwrap();
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Strips leading and trailing slashes for path comparison.
fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// The last non-empty path segment of an href.
fn trailing_segment(href: &str) -> Option<String> {
    href.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_string())
}
