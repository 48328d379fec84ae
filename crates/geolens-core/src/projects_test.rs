use super::*;

fn project(name: &str, brand: &str, competitors: &[&str]) -> ProjectConfig {
    ProjectConfig {
        id: Uuid::new_v4(),
        name: name.to_string(),
        brand: brand.to_string(),
        competitors: competitors.iter().map(|c| (*c).to_string()).collect(),
        keywords: vec![],
        tracked_queries: vec![],
    }
}

#[test]
fn slug_simple_name() {
    assert_eq!(project("Klio Tutoring", "Klio AI", &[]).slug(), "klio-tutoring");
}

#[test]
fn slug_special_characters() {
    assert_eq!(
        project("Acme's CRM (EU)", "Acme", &[]).slug(),
        "acmes-crm-eu"
    );
}

#[test]
fn known_brands_puts_brand_first() {
    let p = project("Klio", "Klio AI", &["TutorPlus", "MindCoach"]);
    assert_eq!(p.known_brands(), vec!["Klio AI", "TutorPlus", "MindCoach"]);
}

#[test]
fn parse_projects_valid_yaml() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Klio Tutoring
    brand: Klio AI
    competitors: [TutorPlus, MindCoach]
    keywords: [ai tutor]
    tracked_queries:
      - best AI tutor
      - AI tutor for kids
"#;
    let file = parse_projects(yaml).unwrap();
    assert_eq!(file.projects.len(), 1);
    let p = &file.projects[0];
    assert_eq!(p.brand, "Klio AI");
    assert_eq!(p.competitors.len(), 2);
    assert_eq!(p.tracked_queries[1], "AI tutor for kids");
}

#[test]
fn parse_projects_optional_lists_default_empty() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Bare
    brand: Bare Brand
"#;
    let file = parse_projects(yaml).unwrap();
    let p = &file.projects[0];
    assert!(p.competitors.is_empty());
    assert!(p.keywords.is_empty());
    assert!(p.tracked_queries.is_empty());
}

#[test]
fn parse_projects_rejects_empty_brand() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Nameless brand
    brand: "  "
"#;
    let err = parse_projects(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("empty brand")));
}

#[test]
fn parse_projects_rejects_brand_listed_as_competitor() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Loop
    brand: Klio AI
    competitors: [klio ai]
"#;
    let err = parse_projects(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("more than once")));
}

#[test]
fn parse_projects_rejects_duplicate_slug() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Klio Tutoring
    brand: Klio AI
  - id: 0d6b7f52-3a7e-4a43-9c6b-2f7e0f8f1a11
    name: klio tutoring
    brand: Other
"#;
    let err = parse_projects(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate project slug")));
}

#[test]
fn parse_projects_rejects_blank_tracked_query() {
    let yaml = r#"
projects:
  - id: 6f1c1b0e-8a4b-4c1e-9a59-1f2d3c4b5a69
    name: Klio Tutoring
    brand: Klio AI
    tracked_queries: ["best AI tutor", ""]
"#;
    let err = parse_projects(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("blank tracked query")));
}

#[test]
fn parse_projects_malformed_yaml_is_parse_error() {
    let err = parse_projects("projects: [").unwrap_err();
    assert!(matches!(err, ConfigError::ProjectsFileParse(_)));
}

#[test]
fn find_by_slug_or_id() {
    let p = project("Klio Tutoring", "Klio AI", &[]);
    let id = p.id.to_string();
    let file = ProjectsFile { projects: vec![p] };
    assert!(file.find("klio-tutoring").is_some());
    assert!(file.find(&id).is_some());
    assert!(file.find("unknown").is_none());
}

#[test]
fn load_projects_missing_file_is_io_error() {
    let err = load_projects(Path::new("/definitely/not/here/projects.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::ProjectsFileIo { .. }));
}
