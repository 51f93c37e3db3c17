//! Static styling and navigation lookup per entity type.

use std::collections::HashMap;
use std::fmt;

/// Which backend is drawing the graph. Sizes differ between the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
	/// Force-directed layout on a flat canvas.
	#[default]
	TwoD,
	/// Physics simulation viewed through a perspective camera.
	ThreeD,
}

impl ViewMode {
	/// The other mode.
	pub fn toggled(self) -> Self {
		match self {
			ViewMode::TwoD => ViewMode::ThreeD,
			ViewMode::ThreeD => ViewMode::TwoD,
		}
	}

	/// Short toolbar label.
	pub fn label(self) -> &'static str {
		match self {
			ViewMode::TwoD => "2D",
			ViewMode::ThreeD => "3D",
		}
	}
}

/// Kind of entity a node represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
	/// Standard operating procedure document.
	ProcessDocument,
	/// Autonomous agent.
	Agent,
	/// Organisational unit.
	Department,
	/// Business process.
	Process,
	/// Person.
	Person,
	/// Glossary term.
	Term,
	/// Free-form tag.
	Tag,
	/// Category.
	Category,
	/// Decorative node, never listed in the legend.
	EasterEgg,
	/// Anything the registry does not know about yet.
	#[default]
	Unknown,
}

impl EntityType {
	/// Every type, in legend order.
	pub const ALL: [EntityType; 10] = [
		EntityType::ProcessDocument,
		EntityType::Agent,
		EntityType::Department,
		EntityType::Process,
		EntityType::Person,
		EntityType::Term,
		EntityType::Tag,
		EntityType::Category,
		EntityType::EasterEgg,
		EntityType::Unknown,
	];

	/// Parses the `type` field of a raw element. Never fails.
	pub fn from_wire(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"sop" | "process_document" | "document" => EntityType::ProcessDocument,
			"agent" | "autonomous_agent" => EntityType::Agent,
			"department" | "unit" | "organizational_unit" | "organisational_unit" => {
				EntityType::Department
			}
			"process" | "business_process" => EntityType::Process,
			"person" | "user" => EntityType::Person,
			"term" | "glossary" | "glossary_term" => EntityType::Term,
			"tag" => EntityType::Tag,
			"category" => EntityType::Category,
			"easter_egg" | "egg" => EntityType::EasterEgg,
			_ => EntityType::Unknown,
		}
	}

	/// Canonical wire name.
	pub fn wire_name(self) -> &'static str {
		match self {
			EntityType::ProcessDocument => "sop",
			EntityType::Agent => "agent",
			EntityType::Department => "department",
			EntityType::Process => "process",
			EntityType::Person => "person",
			EntityType::Term => "term",
			EntityType::Tag => "tag",
			EntityType::Category => "category",
			EntityType::EasterEgg => "easter_egg",
			EntityType::Unknown => "unknown",
		}
	}

	/// Human-readable label.
	pub fn label(self) -> &'static str {
		match self {
			EntityType::ProcessDocument => "SOP",
			EntityType::Agent => "Agent",
			EntityType::Department => "Department",
			EntityType::Process => "Process",
			EntityType::Person => "Person",
			EntityType::Term => "Glossary term",
			EntityType::Tag => "Tag",
			EntityType::Category => "Category",
			EntityType::EasterEgg => "???",
			EntityType::Unknown => "Other",
		}
	}

	/// Whether the type gets a legend entry and a filter chip.
	pub fn is_listed(self) -> bool {
		!matches!(self, EntityType::EasterEgg | EntityType::Unknown)
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Visual and navigation settings of one type.
#[derive(Clone, Debug, PartialEq)]
struct TypeStyle {
	color: String,
	size_2d: f64,
	size_3d: f64,
	/// Destination template; `{id}` is replaced by the node id.
	url_template: Option<String>,
}

impl TypeStyle {
	fn new(color: &str, size_2d: f64, size_3d: f64, url_template: Option<&str>) -> Self {
		Self {
			color: color.into(),
			size_2d,
			size_3d,
			url_template: url_template.map(Into::into),
		}
	}
}

/// Lookup table from entity type to style. Unknown types use `fallback`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRegistry {
	styles: HashMap<EntityType, TypeStyle>,
	fallback: TypeStyle,
}

impl Default for TypeRegistry {
	fn default() -> Self {
		Self::standard()
	}
}

impl TypeRegistry {
	/// The built-in palette and routes.
	pub fn standard() -> Self {
		let styles = HashMap::from([
			(
				EntityType::ProcessDocument,
				TypeStyle::new("#3b82f6", 8.0, 6.0, Some("/sops/{id}")),
			),
			(
				EntityType::Agent,
				TypeStyle::new("#10b981", 9.0, 7.0, Some("/agents/{id}")),
			),
			(EntityType::Department, TypeStyle::new("#f59e0b", 11.0, 9.0, None)),
			(
				EntityType::Process,
				TypeStyle::new("#8b5cf6", 9.0, 7.0, Some("/processes/{id}")),
			),
			(
				EntityType::Person,
				TypeStyle::new("#ec4899", 7.0, 5.0, Some("/users/{id}")),
			),
			(EntityType::Term, TypeStyle::new("#06b6d4", 6.0, 4.0, None)),
			(EntityType::Tag, TypeStyle::new("#84cc16", 5.0, 3.0, None)),
			(EntityType::Category, TypeStyle::new("#f97316", 7.0, 5.0, None)),
			(EntityType::EasterEgg, TypeStyle::new("#facc15", 6.0, 8.0, None)),
		]);
		Self {
			styles,
			fallback: TypeStyle::new("#94a3b8", 6.0, 4.0, None),
		}
	}

	/// Replaces (or removes, with `None`) the destination template of a type.
	pub fn with_url_template(mut self, entity_type: EntityType, template: Option<&str>) -> Self {
		if let Some(style) = self.styles.get_mut(&entity_type) {
			style.url_template = template.map(Into::into);
		}
		self
	}

	fn style(&self, entity_type: EntityType) -> &TypeStyle {
		self.styles.get(&entity_type).unwrap_or(&self.fallback)
	}

	/// CSS colour of a type.
	pub fn color_of(&self, entity_type: EntityType) -> &str {
		&self.style(entity_type).color
	}

	/// Node radius of a type in the given backend.
	pub fn size_of(&self, entity_type: EntityType, mode: ViewMode) -> f64 {
		let style = self.style(entity_type);
		match mode {
			ViewMode::TwoD => style.size_2d,
			ViewMode::ThreeD => style.size_3d,
		}
	}

	/// Detail page of a node, if its type has one.
	pub fn url_of(&self, id: &str, entity_type: EntityType) -> Option<String> {
		self.style(entity_type)
			.url_template
			.as_ref()
			.map(|template| template.replace("{id}", id))
	}
}

/// Parses `#rrggbb` (or `#rgb`) into channels.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
	let hex = color.strip_prefix('#')?;
	let expanded: String = match hex.len() {
		3 => hex.chars().flat_map(|c| [c, c]).collect(),
		6 => hex.to_string(),
		_ => return None,
	};
	let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
	Some((channel(0)?, channel(2)?, channel(4)?))
}

/// `rgba(..)` form of a registry color. Unparseable colors become neutral grey.
pub fn with_alpha(color: &str, alpha: f64) -> String {
	let (r, g, b) = parse_hex(color).unwrap_or((148, 163, 184));
	format!("rgba({r}, {g}, {b}, {alpha:.3})")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wire_names_round_trip() {
		for t in EntityType::ALL {
			assert_eq!(EntityType::from_wire(t.wire_name()), t);
		}
		assert_eq!(EntityType::from_wire(" Business-Process "), EntityType::Process);
		assert_eq!(EntityType::from_wire("autonomous-agent"), EntityType::Agent);
		assert_eq!(EntityType::from_wire("Autonomous_Agent"), EntityType::Agent);
		assert_eq!(EntityType::from_wire("organisational-unit"), EntityType::Department);
		assert_eq!(EntityType::from_wire("organizational-unit"), EntityType::Department);
		assert_eq!(EntityType::from_wire("spaceship"), EntityType::Unknown);
	}

	#[test]
	fn unknown_types_fall_back() {
		let registry = TypeRegistry::standard();
		assert_eq!(registry.color_of(EntityType::Unknown), "#94a3b8");
		assert_eq!(registry.size_of(EntityType::Unknown, ViewMode::TwoD), 6.0);
		assert_eq!(registry.url_of("x", EntityType::Unknown), None);
	}

	#[test]
	fn sizes_depend_on_mode() {
		let registry = TypeRegistry::standard();
		assert!(
			registry.size_of(EntityType::Department, ViewMode::TwoD)
				> registry.size_of(EntityType::Department, ViewMode::ThreeD)
		);
	}

	#[test]
	fn url_templates() {
		let registry = TypeRegistry::standard();
		assert_eq!(
			registry.url_of("p1", EntityType::ProcessDocument).as_deref(),
			Some("/sops/p1")
		);
		assert_eq!(registry.url_of("t1", EntityType::Tag), None);
		assert_eq!(registry.url_of("d1", EntityType::Department), None);

		let registry = registry.with_url_template(EntityType::Department, Some("/org/{id}"));
		assert_eq!(
			registry.url_of("d1", EntityType::Department).as_deref(),
			Some("/org/d1")
		);
	}

	#[test]
	fn alpha_tint() {
		assert_eq!(with_alpha("#ff0000", 0.5), "rgba(255, 0, 0, 0.500)");
		assert_eq!(with_alpha("#0f0", 1.0), "rgba(0, 255, 0, 1.000)");
		assert_eq!(with_alpha("teal", 0.25), "rgba(148, 163, 184, 0.250)");
	}
}
