//! File templates for the driver package and the extension descriptor

/// Placeholder replaced by the driver name
pub const DRIVER_NAME_PLACEHOLDER: &str = "{DRIVER_NAME}";

/// Substitute the driver name into a template
pub fn with_driver_name(template: &str, driver_name: &str) -> String {
    template.replace(DRIVER_NAME_PLACEHOLDER, driver_name)
}

/// `.gdextension` descriptor the engine reads to load the driver
pub const EXTENSION_TEMPLATE: &str = r#"[configuration]
entry_symbol = "swift_entry_point"
compatibility_minimum = 4.2


[libraries]
macos.debug = "res://bin/lib{DRIVER_NAME}.dylib"
macos.release = "res://bin/lib{DRIVER_NAME}.dylib"
ios.debug = "res://bin/{DRIVER_NAME}.framework"
ios.release = "res://bin/{DRIVER_NAME}.framework"


[dependencies]
macos.debug = {"res://bin/libSwiftGodot.dylib" : ""}
macos.release = {"res://bin/libSwiftGodot.dylib" : ""}
ios.debug = {"res://bin/SwiftGodot.framework" : ""}
ios.release = {"res://bin/SwiftGodot.framework" : ""}
"#;

/// `Package.swift` of a new driver
pub const PACKAGE_TEMPLATE: &str = r#"// swift-tools-version: 6.0

import PackageDescription

let package = Package(
    name: "{DRIVER_NAME}",
    platforms: [.macOS(.v15), .iOS(.v17)],
    products: [
        .library(
            name: "{DRIVER_NAME}",
            type: .dynamic,
            targets: ["{DRIVER_NAME}"]),
    ],
    dependencies: [
        .package(url: "https://github.com/migueldeicaza/SwiftGodot", branch: "main")
    ],
    targets: [
        .target(
            name: "{DRIVER_NAME}",
            dependencies: [
                "SwiftGodot",
            ],
            swiftSettings: [.unsafeFlags(["-suppress-warnings"])]
        ),
        .testTarget(
            name: "{DRIVER_NAME}Tests",
            dependencies: ["{DRIVER_NAME}"]
        ),
    ]
)
"#;

/// Entry point source of a new driver
pub const DRIVER_TEMPLATE: &str = r#"import SwiftGodot

#initSwiftExtension(cdecl: "swift_entry_point", types: [])
"#;

/// Test target source of a new driver
pub const TESTS_TEMPLATE: &str = r#"import XCTest
@testable import {DRIVER_NAME}

final class {DRIVER_NAME}Tests: XCTestCase {
    func testExample() throws {
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_template_substitution() {
        let rendered = with_driver_name(EXTENSION_TEMPLATE, "SpaceDriver");

        assert!(!rendered.contains(DRIVER_NAME_PLACEHOLDER));
        assert!(rendered.contains("macos.debug = \"res://bin/libSpaceDriver.dylib\""));
        assert!(rendered.contains("ios.release = \"res://bin/SpaceDriver.framework\""));
        assert!(rendered.contains("[configuration]"));
        assert!(rendered.contains("[libraries]"));
        assert!(rendered.contains("[dependencies]"));
    }

    #[test]
    fn test_package_template_substitution() {
        let rendered = with_driver_name(PACKAGE_TEMPLATE, "SpaceDriver");
        assert!(rendered.contains("name: \"SpaceDriver\""));
        assert!(rendered.contains("name: \"SpaceDriverTests\""));
    }
}
