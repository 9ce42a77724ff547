use nestor_util::errors::NestorError;

#[test]
fn test_configuration_error_display() {
    let err = NestorError::Configuration {
        message: "included build 'plugins' does not exist".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Configuration error: included build 'plugins' does not exist"
    );
}

#[test]
fn test_resolution_conflict_display_names_both_origins() {
    let err = NestorError::ResolutionConflict {
        id: "project.buildSrc".to_string(),
        first: "build 'project' project 'buildSrc'".to_string(),
        second: "build 'project.buildSrc' project ''".to_string(),
    };
    let s = err.to_string();
    assert!(s.contains("'project.buildSrc'"));
    assert!(s.contains("build 'project' project 'buildSrc'"));
    assert!(s.contains("build 'project.buildSrc' project ''"));
}

#[test]
fn test_dependency_resolution_display() {
    let err = NestorError::DependencyResolution {
        module: "project.main".to_string(),
        message: "project 'lib' not found".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Unresolved dependency in 'project.main': project 'lib' not found"
    );
}

#[test]
fn test_version_incompatibility_display() {
    let err = NestorError::VersionIncompatibility {
        version: "banana".to_string(),
        fallback: ">=6.7, <9.0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Unrecognized tool version 'banana', using the >=6.7, <9.0 rules"
    );
}

#[test]
fn test_fatal_classification() {
    assert!(NestorError::Configuration {
        message: String::new()
    }
    .is_fatal());
    assert!(NestorError::ResolutionConflict {
        id: String::new(),
        first: String::new(),
        second: String::new(),
    }
    .is_fatal());
    assert!(!NestorError::DependencyResolution {
        module: String::new(),
        message: String::new(),
    }
    .is_fatal());
    assert!(!NestorError::VersionIncompatibility {
        version: String::new(),
        fallback: String::new(),
    }
    .is_fatal());
}

#[test]
fn test_generic_error_display() {
    let err = NestorError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}
