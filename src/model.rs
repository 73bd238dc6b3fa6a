//! Typed views of compositor state
//!
//! These are the reply shapes documented in `sway-ipc(7)`: flat objects for
//! the list queries (workspaces, outputs, inputs, seats, bar config) and the
//! recursive [`Node`] tree for `GET_TREE`.
//!
//! Decoding is lenient where the compositor itself is inconsistent: the tree
//! omits most kind-specific fields on other kinds, inactive outputs omit
//! mode and scale information, and unknown keys are kept as raw JSON in an
//! `extra` map rather than rejected. Enumerated literals are closed sets; an
//! unknown literal is a decode error.

use std::collections::{HashMap, VecDeque};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::decode;

/// Name of the invisible output backing the scratchpad workspace
pub const SCRATCHPAD_OUTPUT: &str = "__i3_scratch";

/// An x/y position with a width and height, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Per-side gap sizes around a bar or container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Gaps {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

/// One display mode advertised by an output
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct OutputMode {
    pub width: i32,
    pub height: i32,
    /// Refresh rate in millihertz
    pub refresh: f64,
}

/// Outcome of one sub-command of a `RUN_COMMAND` request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    /// Set when the command could not even be parsed
    #[serde(default)]
    pub parse_error: Option<bool>,
    /// Human-readable failure description
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply to `GET_VERSION`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub human_readable: String,
    #[serde(default)]
    pub loaded_config_file_name: Option<String>,
}

/// Reply to `GET_BAR_CONFIG` for a specific bar id
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub id: String,
    pub mode: String,
    pub position: String,
    pub status_command: Option<String>,
    pub font: String,
    pub workspace_buttons: bool,
    pub workspace_min_width: i32,
    pub binding_mode_indicator: bool,
    pub verbose: bool,
    pub colors: HashMap<String, String>,
    pub gaps: Gaps,
    pub bar_height: i32,
    pub status_padding: i32,
    pub status_edge_padding: i32,
}

/// One entry of the `GET_WORKSPACES` reply
///
/// This is the flat summary shape; the full workspace state, including the
/// contained windows, lives in the [`Node`] tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub num: i32,
    pub name: String,
    pub visible: bool,
    pub focused: bool,
    pub urgent: bool,
    pub rect: Rect,
    pub output: String,
}

/// One entry of the `GET_OUTPUTS` reply
///
/// Disabled outputs omit most fields beyond the hardware identity, hence
/// the optionals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Output {
    pub name: String,
    pub make: String,
    pub model: String,
    pub serial: String,
    pub active: bool,
    #[serde(default)]
    pub dpms: bool,
    #[serde(default)]
    pub power: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default, deserialize_with = "decode::none_literal")]
    pub subpixel_hinting: Option<Subpixel>,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub current_workspace: Option<String>,
    #[serde(default)]
    pub modes: Vec<OutputMode>,
    #[serde(default)]
    pub current_mode: Option<OutputMode>,
}

/// libinput device settings attached to an [`Input`]
///
/// Every field is optional; libinput only reports the settings a device
/// actually supports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LibInput {
    pub send_events: Option<String>,
    pub tap: Option<String>,
    pub tap_button_map: Option<String>,
    pub tap_drag: Option<String>,
    pub tap_drag_lock: Option<String>,
    pub accel_speed: Option<f64>,
    pub accel_profile: Option<String>,
    pub natural_scroll: Option<String>,
    pub left_handed: Option<String>,
    pub click_method: Option<String>,
    pub middle_emulation: Option<String>,
    pub scroll_method: Option<String>,
    pub scroll_button: Option<i32>,
    pub dwt: Option<String>,
    pub dwtp: Option<String>,
    pub calibration_matrix: Option<Vec<f64>>,
}

/// One entry of the `GET_INPUTS` reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Input {
    pub identifier: String,
    pub name: String,
    pub vendor: i64,
    pub product: i64,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default)]
    pub xkb_active_layout_name: Option<String>,
    #[serde(default)]
    pub xkb_layout_names: Option<Vec<String>>,
    #[serde(default)]
    pub xkb_active_layout_index: Option<i32>,
    #[serde(default)]
    pub scroll_factor: Option<f64>,
    #[serde(default)]
    pub libinput: Option<LibInput>,
    #[serde(default)]
    pub repeat_delay: Option<f64>,
    #[serde(default)]
    pub repeat_rate: Option<f64>,
}

/// One entry of the `GET_SEATS` reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Seat {
    pub name: String,
    pub capabilities: i32,
    pub focus: i64,
    #[serde(default)]
    pub devices: Vec<Input>,
}

/// Window metadata reported for Xwayland views
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct X11Window {
    pub title: Option<String>,
    pub class: Option<String>,
    pub instance: Option<String>,
    pub window_role: Option<String>,
    pub window_type: Option<String>,
    pub transient_for: Option<Value>,
}

/// Border style of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    Normal,
    Pixel,
    Csd,
}

/// Tiling layout of a container's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    SplitH,
    SplitV,
    Stacked,
    Tabbed,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Subpixel hinting arrangement of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subpixel {
    Rgb,
    Bgr,
    Vrgb,
    Vbgr,
    Unknown,
}

/// Output rotation/flip state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Transform {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "90")]
    Rotate90,
    #[serde(rename = "180")]
    Rotate180,
    #[serde(rename = "270")]
    Rotate270,
    #[serde(rename = "flipped-90")]
    Flipped90,
    #[serde(rename = "flipped-180")]
    Flipped180,
    #[serde(rename = "flipped-270")]
    Flipped270,
}

/// Device category of an [`Input`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Touchpad,
    Pointer,
    Keyboard,
    Touch,
    TabletTool,
    TabletPad,
    Switch,
}

/// Fields shared by every node of the containment tree
///
/// The compositor only sends the fields that apply to a given node, so all
/// of them tolerate absence. Keys that no declared field claims are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeCommon {
    pub id: i64,
    pub name: Option<String>,
    #[serde(deserialize_with = "decode::none_literal")]
    pub border: Option<Border>,
    pub current_border_width: i32,
    #[serde(deserialize_with = "decode::none_literal")]
    pub layout: Option<Layout>,
    #[serde(deserialize_with = "decode::none_literal")]
    pub orientation: Option<Orientation>,
    pub percent: Option<f64>,
    pub rect: Rect,
    pub window_rect: Rect,
    pub deco_rect: Rect,
    pub geometry: Rect,
    pub urgent: bool,
    pub sticky: bool,
    pub focused: bool,
    pub marks: Vec<String>,
    /// Child ids in focus order; not an ownership reference
    pub focus: Vec<i64>,
    /// Owned tiling children
    pub nodes: Vec<Node>,
    /// Owned floating children
    pub floating_nodes: Vec<Node>,
    /// Raw passthrough for keys outside the declared shape
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An output node of the containment tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub make: String,
    pub model: String,
    pub serial: String,
    pub active: bool,
    pub dpms: bool,
    pub power: bool,
    pub primary: bool,
    pub scale: Option<f64>,
    #[serde(deserialize_with = "decode::none_literal")]
    pub subpixel_hinting: Option<Subpixel>,
    pub transform: Option<Transform>,
    pub current_workspace: Option<String>,
    pub modes: Vec<OutputMode>,
    pub current_mode: Option<OutputMode>,
}

/// A workspace node of the containment tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkspaceNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    /// Workspace number, or -1 for named-only workspaces
    pub num: i32,
    /// Name of the owning output
    pub output: String,
    pub visible: bool,
    pub representation: Option<String>,
}

/// A tiling or floating container node, including application views
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerNode {
    #[serde(flatten)]
    pub common: NodeCommon,
    pub fullscreen_mode: u8,
    /// Wayland app id; absent for Xwayland views
    pub app_id: Option<String>,
    pub pid: Option<i32>,
    pub visible: bool,
    pub shell: Option<String>,
    pub inhibit_idle: bool,
    pub idle_inhibitors: Option<Value>,
    /// X11 window id, for Xwayland views
    pub window: Option<i64>,
    pub window_properties: Option<X11Window>,
}

/// One element of the window/output/workspace containment tree
///
/// The `type` field of the raw object selects the variant; an unrecognized
/// value is a decode error. Each variant carries the shared [`NodeCommon`]
/// fields plus its own extensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Root(NodeCommon),
    Output(OutputNode),
    Workspace(WorkspaceNode),
    Con(ContainerNode),
    FloatingCon(ContainerNode),
}

impl Node {
    /// The fields every node kind shares
    pub fn common(&self) -> &NodeCommon {
        match self {
            Node::Root(common) => common,
            Node::Output(output) => &output.common,
            Node::Workspace(workspace) => &workspace.common,
            Node::Con(con) | Node::FloatingCon(con) => &con.common,
        }
    }

    pub fn id(&self) -> i64 {
        self.common().id
    }

    pub fn name(&self) -> Option<&str> {
        self.common().name.as_deref()
    }

    pub fn focused(&self) -> bool {
        self.common().focused
    }

    /// Breadth-first traversal of this subtree, tiling children before
    /// floating ones, starting with this node itself
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            queue: VecDeque::from([self]),
        }
    }

    /// Find the first node in this subtree matching `predicate`
    pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<&Node> {
        self.traverse().find(|node| predicate(node))
    }

    /// Find the focused view within this subtree, if any
    pub fn find_focused(&self) -> Option<&Node> {
        self.find(|node| node.focused() && matches!(node, Node::Con(_) | Node::FloatingCon(_)))
    }
}

/// Iterator returned by [`Node::traverse`]
#[derive(Debug)]
pub struct Traverse<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        let common = node.common();
        self.queue.extend(common.nodes.iter());
        self.queue.extend(common.floating_nodes.iter());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_node_exposes_num_and_output() {
        let node: Node = serde_json::from_str(
            r#"{"type": "workspace", "id": 7, "name": "2", "num": 2, "output": "eDP-1"}"#,
        )
        .unwrap();
        match &node {
            Node::Workspace(ws) => {
                assert_eq!(ws.num, 2);
                assert_eq!(ws.output, "eDP-1");
                assert_eq!(ws.common.id, 7);
            }
            other => panic!("expected workspace node, got {other:?}"),
        }
        assert_eq!(node.name(), Some("2"));
    }

    #[test]
    fn container_node_exposes_pid_and_app_id() {
        let node: Node = serde_json::from_str(r#"{"type": "con", "pid": 123, "app_id": "foo"}"#)
            .unwrap();
        match node {
            Node::Con(con) => {
                assert_eq!(con.pid, Some(123));
                assert_eq!(con.app_id.as_deref(), Some("foo"));
            }
            other => panic!("expected container node, got {other:?}"),
        }
    }

    #[test]
    fn floating_con_decodes_as_its_own_variant() {
        let node: Node =
            serde_json::from_str(r#"{"type": "floating_con", "id": 9}"#).unwrap();
        assert!(matches!(node, Node::FloatingCon(_)));
        assert_eq!(node.id(), 9);
    }

    #[test]
    fn unknown_node_type_is_a_decode_error() {
        let result: Result<Node, _> = serde_json::from_str(r#"{"type": "bogus"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn absent_optional_fields_decode_unset() {
        let node: Node = serde_json::from_str(r#"{"type": "con", "id": 1}"#).unwrap();
        let common = node.common();
        assert_eq!(common.border, None);
        assert_eq!(common.layout, None);
        assert_eq!(common.percent, None);
        assert!(common.marks.is_empty());
        assert!(common.nodes.is_empty());
    }

    #[test]
    fn none_literal_border_decodes_unset() {
        let node: Node =
            serde_json::from_str(r#"{"type": "con", "id": 1, "border": "none"}"#).unwrap();
        assert_eq!(node.common().border, None);
    }

    #[test]
    fn unknown_border_literal_is_a_decode_error() {
        let result: Result<Node, _> =
            serde_json::from_str(r#"{"type": "con", "id": 1, "border": "double"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn undeclared_keys_are_kept_as_passthrough() {
        let node: Node = serde_json::from_str(
            r#"{"type": "con", "id": 1, "some_future_field": {"a": 1}}"#,
        )
        .unwrap();
        let extra = &node.common().extra;
        assert_eq!(extra["some_future_field"]["a"], 1);
    }

    #[test]
    fn tree_decodes_recursively() {
        let tree: Node = serde_json::from_str(
            r#"{
                "type": "root", "id": 1, "name": "root",
                "focus": [3],
                "nodes": [{
                    "type": "output", "id": 3, "name": "eDP-1",
                    "make": "Unknown", "model": "0x38ED", "serial": "", "active": true,
                    "nodes": [{
                        "type": "workspace", "id": 4, "name": "1", "num": 1, "output": "eDP-1",
                        "layout": "splith",
                        "nodes": [
                            {"type": "con", "id": 5, "pid": 100, "app_id": "foot", "focused": true}
                        ],
                        "floating_nodes": [
                            {"type": "floating_con", "id": 6, "pid": 200, "app_id": "wev"}
                        ]
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert!(matches!(tree, Node::Root(_)));
        assert_eq!(tree.common().focus, vec![3]);

        let ids: Vec<i64> = tree.traverse().map(Node::id).collect();
        assert_eq!(ids, vec![1, 3, 4, 5, 6]);

        let focused = tree.find_focused().expect("one view is focused");
        assert_eq!(focused.id(), 5);
        match focused {
            Node::Con(con) => assert_eq!(con.app_id.as_deref(), Some("foot")),
            other => panic!("expected view container, got {other:?}"),
        }
    }

    #[test]
    fn nested_nodes_keep_literals_and_passthrough_straight() {
        // Shared fields, "none" literals, and undeclared keys must all land
        // on the node that carried them, at any depth.
        let tree: Node = serde_json::from_str(
            r#"{"type": "root", "id": 1,
                "nodes": [{"type": "workspace", "id": 2, "num": 1, "output": "eDP-1",
                           "border": "none",
                           "nodes": [{"type": "con", "id": 3, "layout": "tabbed",
                                      "future_key": true}]}]}"#,
        )
        .unwrap();

        let workspace = &tree.common().nodes[0];
        assert_eq!(workspace.common().border, None);
        assert!(!workspace.common().extra.contains_key("border"));

        let con = &workspace.common().nodes[0];
        assert_eq!(con.common().layout, Some(Layout::Tabbed));
        assert_eq!(con.common().extra["future_key"], true);
    }

    #[test]
    fn flat_workspace_reply_decodes() {
        let workspaces: Vec<Workspace> = serde_json::from_str(
            r#"[{
                "id": 4, "num": 1, "name": "1", "visible": true, "focused": true,
                "urgent": false, "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                "output": "eDP-1"
            }]"#,
        )
        .unwrap();
        assert_eq!(workspaces.len(), 1);
        assert_eq!(workspaces[0].num, 1);
        assert_eq!(workspaces[0].rect.width, 1920);
    }

    #[test]
    fn missing_required_workspace_field_is_a_decode_error() {
        // The flat reply shape requires its core fields.
        let result: Result<Workspace, _> = serde_json::from_str(r#"{"id": 4, "num": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn inactive_output_decodes_without_mode_fields() {
        let output: Output = serde_json::from_str(
            r#"{"name": "HDMI-A-1", "make": "Dell", "model": "U2720Q",
                "serial": "ABC123", "active": false}"#,
        )
        .unwrap();
        assert!(!output.active);
        assert_eq!(output.scale, None);
        assert_eq!(output.current_mode, None);
        assert!(output.modes.is_empty());
    }

    #[test]
    fn active_output_decodes_modes_and_transform() {
        let output: Output = serde_json::from_str(
            r#"{"name": "eDP-1", "make": "Unknown", "model": "0x38ED", "serial": "",
                "active": true, "dpms": true, "power": true, "primary": false,
                "scale": 1.5, "subpixel_hinting": "rgb", "transform": "90",
                "current_workspace": "1",
                "modes": [{"width": 1920, "height": 1080, "refresh": 60000}],
                "current_mode": {"width": 1920, "height": 1080, "refresh": 60000}}"#,
        )
        .unwrap();
        assert_eq!(output.scale, Some(1.5));
        assert_eq!(output.subpixel_hinting, Some(Subpixel::Rgb));
        assert_eq!(output.transform, Some(Transform::Rotate90));
        assert_eq!(output.modes.len(), 1);
    }

    #[test]
    fn command_result_decodes_failure_details() {
        let results: Vec<CommandResult> = serde_json::from_str(
            r#"[{"success": true},
                {"success": false, "parse_error": true, "error": "Unknown/invalid command"}]"#,
        )
        .unwrap();
        assert!(results[0].success);
        assert_eq!(results[0].parse_error, None);
        assert!(!results[1].success);
        assert_eq!(results[1].parse_error, Some(true));
        assert_eq!(results[1].error.as_deref(), Some("Unknown/invalid command"));
    }

    #[test]
    fn version_requires_its_numeric_fields() {
        let version: Version = serde_json::from_str(
            r#"{"major": 1, "minor": 10, "patch": 0, "human_readable": "sway version 1.10"}"#,
        )
        .unwrap();
        assert_eq!(version.minor, 10);
        assert_eq!(version.loaded_config_file_name, None);

        let result: Result<Version, _> =
            serde_json::from_str(r#"{"minor": 10, "patch": 0, "human_readable": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn input_decodes_with_libinput_settings() {
        let input: Input = serde_json::from_str(
            r#"{"identifier": "1267:12608:MSFT0001:01_04F3:3140_Touchpad",
                "name": "MSFT0001:01 04F3:3140 Touchpad",
                "vendor": 1267, "product": 12608, "type": "touchpad",
                "scroll_factor": 1.0,
                "libinput": {"send_events": "enabled", "tap": "enabled",
                             "natural_scroll": "disabled", "accel_speed": 0.0}}"#,
        )
        .unwrap();
        assert_eq!(input.kind, InputKind::Touchpad);
        let libinput = input.libinput.expect("touchpads report libinput settings");
        assert_eq!(libinput.tap.as_deref(), Some("enabled"));
        assert_eq!(libinput.scroll_button, None);
    }

    #[test]
    fn seat_decodes_with_devices() {
        let seat: Seat = serde_json::from_str(
            r#"{"name": "seat0", "capabilities": 3, "focus": 5,
                "devices": [{"identifier": "0:0:kbd", "name": "kbd",
                             "vendor": 0, "product": 0, "type": "keyboard"}]}"#,
        )
        .unwrap();
        assert_eq!(seat.devices.len(), 1);
        assert_eq!(seat.devices[0].kind, InputKind::Keyboard);
    }

    #[test]
    fn bar_config_decodes_with_defaults_for_missing_fields() {
        let bar: BarConfig = serde_json::from_str(
            r##"{"id": "bar-0", "mode": "dock", "position": "bottom",
                "font": "monospace 10", "workspace_buttons": true,
                "binding_mode_indicator": true, "verbose": false,
                "colors": {"background": "#323232"},
                "gaps": {"top": 0, "left": 0, "bottom": 0, "right": 0}}"##,
        )
        .unwrap();
        assert_eq!(bar.id, "bar-0");
        assert_eq!(bar.colors["background"], "#323232");
        assert_eq!(bar.bar_height, 0);
        assert_eq!(bar.status_command, None);
    }

    #[test]
    fn x11_view_decodes_window_properties() {
        let node: Node = serde_json::from_str(
            r#"{"type": "con", "id": 12, "pid": 900, "window": 4194305,
                "window_properties": {"class": "Steam", "instance": "steam",
                                      "title": "Steam"}}"#,
        )
        .unwrap();
        match node {
            Node::Con(con) => {
                assert_eq!(con.window, Some(4194305));
                let props = con.window_properties.unwrap();
                assert_eq!(props.class.as_deref(), Some("Steam"));
                assert_eq!(props.window_role, None);
            }
            other => panic!("expected container node, got {other:?}"),
        }
    }
}
