//! Render pipeline.

use std::sync::Arc;

use dxt_package::Package;
use dxt_xml::XmlDocument;

use crate::environment::RenderEnv;
use crate::error::RenderError;
use crate::options::LayoutOptions;
use crate::processor::PartProcessor;
use crate::value::ContextValue;
use crate::{repair, structure, template::Template};

/// Render `contexts` against a copy of the template's package.
pub(crate) fn render(
    template: &Template,
    contexts: &[ContextValue],
    layout: &LayoutOptions,
) -> Result<Package, RenderError> {
    let (first, rest) = contexts.split_first().ok_or(RenderError::NoContexts)?;
    let registry = template.registry();
    let primary = template.primary_part();
    let mut package = template.package().clone();

    // Later contexts start from the unrendered primary part.
    let primary_doc = package.xml_mut(primary)?;
    let pristine = (!rest.is_empty()).then(|| primary_doc.clone());

    let mut env = RenderEnv::new(template, first, layout.clone());
    let names: Vec<String> = package.part_names().map(str::to_owned).collect();
    for name in &names {
        let processors = registry.resolve(name);
        if processors.is_empty() {
            continue;
        }
        run_processors(processors, name, package.xml_mut(name)?, &mut env)?;
    }
    let mut layout = env.into_layout();

    if let Some(pristine) = pristine {
        let processors = registry.resolve(primary);
        for (index, context) in rest.iter().enumerate() {
            let mut working = pristine.clone();
            let mut env = RenderEnv::new(template, context, layout);
            run_processors(processors, primary, &mut working, &mut env)?;
            layout = env.into_layout();

            let accumulated = package.xml_mut(primary)?;
            structure::relocate_section(accumulated, primary)?;
            let appended = structure::append_body(accumulated, working, primary)?;
            tracing::debug!(context = index + 1, nodes = appended, "Appended context body");
        }
    }

    repair::repair_parts(&mut package, primary)?;

    tracing::info!(
        contexts = contexts.len(),
        parts = package.len(),
        "Rendered template"
    );
    Ok(package)
}

fn run_processors(
    processors: &[Arc<dyn PartProcessor>],
    part: &str,
    doc: &mut XmlDocument,
    env: &mut RenderEnv<'_>,
) -> Result<(), RenderError> {
    for processor in processors {
        tracing::debug!(part, processor = processor.name(), "Running processor");
        processor
            .process(doc, env)
            .map_err(|source| RenderError::Processor {
                processor: processor.name().to_owned(),
                part: part.to_owned(),
                source,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dxt_package::{PackageError, PartContent};
    use dxt_xml::XmlNode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::processors::PlaceholderProcessor;
    use crate::testing::{
        DOCUMENT_RELS, SECTION, body_of, document_xml, paragraph, sample_package,
    };
    use crate::{PRIMARY_PART, PartPattern, ProcessorError, ProcessorRegistry, StructureError};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl PartProcessor for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn process(&self, _: &mut XmlDocument, _: &mut RenderEnv<'_>) -> Result<(), ProcessorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn placeholder_registry() -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new();
        registry.register(PartPattern::exact(PRIMARY_PART), PlaceholderProcessor::new(), false);
        registry
    }

    fn template(body: &str, registry: ProcessorRegistry) -> Template {
        Template::from_package(sample_package(&document_xml(body)), Arc::new(registry)).unwrap()
    }

    fn name(value: &str) -> ContextValue {
        ContextValue::mapping([("name", value)])
    }

    fn primary_body(package: &mut Package) -> String {
        body_of(package.xml_mut(PRIMARY_PART).unwrap())
    }

    #[test]
    fn test_two_contexts_relocate_section() {
        let body = format!("{}{SECTION}", paragraph("Hello {{name}}"));
        let template = template(&body, placeholder_registry());

        let mut output = template
            .render(&[name("A"), name("B")], &LayoutOptions::new())
            .unwrap();

        assert_eq!(
            primary_body(&mut output),
            format!(
                "{}<w:p><w:pPr>{SECTION}</w:pPr></w:p>{}{SECTION}",
                paragraph("Hello A"),
                paragraph("Hello B"),
            )
        );
    }

    #[test]
    fn test_n_contexts_produce_n_sections() {
        let body = format!("{}{SECTION}", paragraph("Hi {{name}}"));
        let template = template(&body, placeholder_registry());
        let contexts = [name("A"), name("B"), name("C")];

        let mut output = template.render(&contexts, &LayoutOptions::new()).unwrap();
        let doc = output.xml_mut(PRIMARY_PART).unwrap();
        let children = &doc.body().unwrap().children;

        let tags: Vec<String> = children
            .iter()
            .map(|child| match child.local_name() {
                "sectPr" => "S".to_owned(),
                _ if child.child("w:pPr").is_some() => "s".to_owned(),
                _ => child.text_content(),
            })
            .collect();
        assert_eq!(tags, vec!["Hi A", "s", "Hi B", "s", "Hi C", "S"]);
    }

    #[test]
    fn test_single_context_keeps_entry_set() {
        let template = template(&paragraph("{{name}}"), placeholder_registry());

        let bytes = template
            .render_to_bytes(&[name("A")], &LayoutOptions::new())
            .unwrap();
        let output = Package::from_bytes(&bytes).unwrap();

        assert_eq!(
            output.part_names().collect::<Vec<_>>(),
            template.package().part_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unmatched_parts_are_byte_identical() {
        let template = template(&paragraph("{{name}}"), placeholder_registry());

        let bytes = template
            .render_to_bytes(&[name("A")], &LayoutOptions::new())
            .unwrap();
        let output = Package::from_bytes(&bytes).unwrap();

        for part in ["word/_rels/document.xml.rels", "word/styles.xml", "word/media/image1.png"] {
            assert_eq!(output.part(part), template.package().part(part), "{part}");
        }
        assert_eq!(
            output.part("word/_rels/document.xml.rels"),
            Some(&PartContent::Raw(DOCUMENT_RELS.as_bytes().to_vec()))
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let template = template(&paragraph("{{name}}"), placeholder_registry());
        let layout = LayoutOptions::new();

        let first = template.render_to_bytes(&[name("A")], &layout).unwrap();
        let second = template.render_to_bytes(&[name("A")], &layout).unwrap();
        assert_eq!(first, second);

        let reopened = Template::from_bytes(
            &template.package().to_bytes().unwrap(),
            Arc::new(placeholder_registry()),
        )
        .unwrap();
        assert_eq!(reopened.render_to_bytes(&[name("A")], &layout).unwrap(), first);
    }

    #[test]
    fn test_invocation_counts_follow_registration() {
        let counter = Arc::new(Counter::default());
        let shared: Arc<dyn PartProcessor> = Arc::clone(&counter) as Arc<dyn PartProcessor>;
        let mut registry = ProcessorRegistry::new();
        registry.register_shared(PartPattern::exact("word/styles.xml"), Arc::clone(&shared), false);
        registry.register_shared(PartPattern::exact("word/styles.xml"), Arc::clone(&shared), false);
        let template = Template::from_package(
            sample_package(&document_xml(&paragraph("x"))),
            Arc::new(registry.clone()),
        )
        .unwrap();

        template.render_one(&name("A"), &LayoutOptions::new()).unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);

        registry.register_shared(PartPattern::exact("word/styles.xml"), shared, true);
        let template = Template::from_package(template.package().clone(), Arc::new(registry)).unwrap();
        template.render_one(&name("A"), &LayoutOptions::new()).unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_non_primary_parts_render_once() {
        let counter = Arc::new(Counter::default());
        let shared: Arc<dyn PartProcessor> = Arc::clone(&counter) as Arc<dyn PartProcessor>;
        let mut registry = placeholder_registry();
        registry.register_shared(
            PartPattern::regex(r"word/header\d*\.xml").unwrap(),
            shared,
            false,
        );
        let body = format!("{}{SECTION}", paragraph("{{name}}"));
        let template = template(&body, registry);

        template
            .render(&[name("A"), name("B"), name("C")], &LayoutOptions::new())
            .unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_primary_part_fails_before_processing() {
        let counter = Arc::new(Counter::default());
        let shared: Arc<dyn PartProcessor> = Arc::clone(&counter) as Arc<dyn PartProcessor>;
        let mut registry = ProcessorRegistry::new();
        registry.register_shared(PartPattern::regex(".*").unwrap(), shared, false);

        let mut package = Package::new();
        package.set_part("word/styles.xml", PartContent::Raw(b"<w:styles/>".to_vec()));
        let err = Template::from_package(package, Arc::new(registry)).unwrap_err();

        assert!(matches!(err, RenderError::Package(PackageError::MissingPart(_))));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_processor_error_propagates() {
        let template = template(&paragraph("{{missing}}"), placeholder_registry());

        let err = template
            .render_one(&name("A"), &LayoutOptions::new())
            .unwrap_err();
        match err {
            RenderError::Processor { processor, part, source } => {
                assert_eq!(processor, "placeholder");
                assert_eq!(part, PRIMARY_PART);
                assert!(matches!(source, ProcessorError::MissingValue(path) if path == "missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_context_sequence_rejected() {
        let template = template(&paragraph("x"), placeholder_registry());
        let err = template.render(&[], &LayoutOptions::new()).unwrap_err();
        assert!(matches!(err, RenderError::NoContexts));
    }

    #[test]
    fn test_multiple_sections_rejected_when_merging() {
        let body = format!("{SECTION}{}{SECTION}", paragraph("x"));
        let template = template(&body, placeholder_registry());

        let single = template.render_one(&name("A"), &LayoutOptions::new());
        assert!(single.is_ok());

        let err = template
            .render(&[name("A"), name("B")], &LayoutOptions::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Structure(StructureError::SectionCount { count: 2, .. })));
    }

    #[test]
    fn test_header_reference_repaired() {
        let body = format!(
            r#"{}<w:sectPr><w:headerReference w:type="default" id="rId7"/></w:sectPr>"#,
            paragraph("x")
        );
        let template = template(&body, ProcessorRegistry::new());

        let mut output = template.render_one(&name("A"), &LayoutOptions::new()).unwrap();
        assert_eq!(
            primary_body(&mut output),
            format!(
                r#"{}<w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr>"#,
                paragraph("x")
            )
        );
    }

    #[test]
    fn test_layout_replaced_by_processor_carries_to_later_contexts() {
        struct Inject;
        impl PartProcessor for Inject {
            fn name(&self) -> &str {
                "inject"
            }
            fn process(&self, _: &mut XmlDocument, env: &mut RenderEnv<'_>) -> Result<(), ProcessorError> {
                let seen = env.layout().get("runs").map_or(0, |v| v.parse::<usize>().unwrap_or(0));
                env.set_layout(LayoutOptions::new().with("runs", (seen + 1).to_string()));
                Ok(())
            }
        }
        struct Record;
        impl PartProcessor for Record {
            fn name(&self) -> &str {
                "record"
            }
            fn process(&self, part: &mut XmlDocument, env: &mut RenderEnv<'_>) -> Result<(), ProcessorError> {
                let runs = env.layout().get("runs").unwrap_or_default().to_owned();
                let body = part.body_mut().unwrap();
                body.children.insert(0, XmlNode::new("w:p").with_attr("runs", runs));
                Ok(())
            }
        }

        let mut registry = ProcessorRegistry::new();
        registry.register(PartPattern::exact(PRIMARY_PART), Inject, false);
        registry.register(PartPattern::exact(PRIMARY_PART), Record, false);
        let body = format!("{}{SECTION}", paragraph("x"));
        let template = template(&body, registry);

        let mut output = template
            .render(&[name("A"), name("B")], &LayoutOptions::new())
            .unwrap();
        let doc = output.xml_mut(PRIMARY_PART).unwrap();
        let runs: Vec<&str> = doc
            .body()
            .unwrap()
            .children
            .iter()
            .filter_map(|child| child.attr("runs"))
            .collect();
        assert_eq!(runs, vec!["1", "2"]);
    }

    #[test]
    fn test_render_to_file_reports_write_failure_with_bytes() {
        let template = template(&paragraph("{{name}}"), placeholder_registry());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.docx");

        let err = template
            .render_to_file(&[name("A")], &LayoutOptions::new(), &path)
            .unwrap_err();
        let RenderError::Write { bytes, .. } = err else {
            panic!("expected write error");
        };
        assert!(Package::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_render_to_file_round_trip() {
        let template = template(&paragraph("Dear {{name}}"), placeholder_registry());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");

        template
            .render_to_file(&[name("Ada")], &LayoutOptions::new(), &path)
            .unwrap();
        let mut output = Package::open(&path).unwrap();
        assert_eq!(primary_body(&mut output), paragraph("Dear Ada"));
    }
}
