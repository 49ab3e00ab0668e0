#[cfg(test)]
mod formatting_tests {
    use crate::error::{Error, Warning};
    use crate::parser::*;
    use crate::renderer::components::{display_width, LinkRenderer};
    use crate::renderer::{MarkdownRenderer, Newline, RenderConfig, Rendered};

    fn doc(children: Vec<Node>) -> Node {
        Node::Passthrough {
            kind: PassthroughKind::Document,
            children,
        }
    }

    fn para(text: &str) -> Node {
        Node::Paragraph(vec![Node::text(text)])
    }

    fn inline(style: InlineStyle, text: &str) -> Node {
        Node::Inline {
            style,
            children: vec![Node::text(text)],
        }
    }

    fn render(node: Node) -> Rendered {
        MarkdownRenderer::default().render(&node).unwrap()
    }

    fn render_with(config: RenderConfig, node: Node) -> Rendered {
        MarkdownRenderer::new(config).render(&node).unwrap()
    }

    fn items(texts: &[&str]) -> Vec<Node> {
        texts
            .iter()
            .map(|text| Node::ListItem(vec![para(text)]))
            .collect()
    }

    #[test]
    fn test_enumerated_list_counts_from_one() {
        let tree = doc(vec![Node::EnumeratedList {
            start: 1,
            children: items(&["a", "b", "c"]),
        }]);
        assert_eq!(render(tree).markdown, "1. a\n\n2. b\n\n3. c");
    }

    #[test]
    fn test_enumerated_list_honours_start() {
        let tree = doc(vec![Node::EnumeratedList {
            start: 5,
            children: items(&["a", "b", "c"]),
        }]);
        assert_eq!(render(tree).markdown, "5. a\n\n6. b\n\n7. c");
    }

    #[test]
    fn test_enumerated_marker_width_grows_with_number() {
        let tree = doc(vec![Node::EnumeratedList {
            start: 9,
            children: vec![
                Node::ListItem(vec![para("nine"), para("more")]),
                Node::ListItem(vec![para("ten"), para("more")]),
            ],
        }]);
        assert_eq!(
            render(tree).markdown,
            "9. nine\n\n   more\n\n10. ten\n\n    more"
        );
    }

    #[test]
    fn test_bullet_list_items() {
        let tree = doc(vec![Node::BulletList(items(&["one", "two"]))]);
        assert_eq!(render(tree).markdown, "* one\n\n* two");
    }

    #[test]
    fn test_note_renders_alert_box() {
        let tree = doc(vec![Node::Admonition {
            kind: AdmonitionKind::Note,
            children: vec![para("Alpha")],
        }]);
        let markdown = render(tree).markdown;
        assert_eq!(markdown, "> [!NOTE]\n> Alpha");
        assert!(markdown.contains("Alpha"));
        assert!(markdown.contains("NOTE"));
    }

    #[test]
    fn test_alert_box_quotes_every_paragraph() {
        let tree = doc(vec![Node::Admonition {
            kind: AdmonitionKind::Warning,
            children: vec![para("First."), para("Second.")],
        }]);
        assert_eq!(
            render(tree).markdown,
            "> [!WARNING]\n> First.\n>\n> Second."
        );
    }

    #[test]
    fn test_labelled_admonitions() {
        let hint = doc(vec![Node::Admonition {
            kind: AdmonitionKind::Hint,
            children: vec![para("Try it.")],
        }]);
        assert_eq!(render(hint).markdown, "Hint: Try it.");

        let generic = doc(vec![Node::Admonition {
            kind: AdmonitionKind::Generic,
            children: vec![Node::Title(vec![Node::text("Heads up")]), para("Careful.")],
        }]);
        assert_eq!(render(generic).markdown, "Heads up: Careful.");
    }

    #[test]
    fn test_internal_reference_renders_xref() {
        let tree = doc(vec![Node::Paragraph(vec![Node::Reference {
            refid: Some("pkg.Mod.func".to_string()),
            refuri: None,
            children: vec![Node::text("func")],
        }])]);
        assert_eq!(render(tree).markdown, "<xref:pkg.Mod.func>");
    }

    #[test]
    fn test_external_reference_renders_link() {
        let tree = doc(vec![Node::Paragraph(vec![Node::Reference {
            refid: None,
            refuri: Some("http://example.com".to_string()),
            children: vec![Node::text("Home")],
        }])]);
        assert_eq!(render(tree).markdown, "[Home](http://example.com)");
    }

    #[test]
    fn test_relative_uri_maps_to_xref_id() {
        assert_eq!(LinkRenderer::xref_id("pkg.Mod.html#pkg.Mod.func"), "pkg.Mod.func");
        assert_eq!(LinkRenderer::xref_id("api/pkg.Mod.html#module-pkg.Mod"), "pkg.Mod");
        assert_eq!(LinkRenderer::xref_id("pkg.Mod.html"), "pkg.Mod");
        assert!(LinkRenderer::is_external("/abs/page.html"));
        assert!(LinkRenderer::is_external("https://docs.python.org/3/"));
        assert!(!LinkRenderer::is_external("pkg.Mod.html"));

        let tree = doc(vec![Node::Paragraph(vec![Node::Reference {
            refid: None,
            refuri: Some("pkg.Mod.html#pkg.Mod.Class".to_string()),
            children: vec![Node::text("Class")],
        }])]);
        assert_eq!(render(tree).markdown, "<xref:pkg.Mod.Class>");
    }

    #[test]
    fn test_pending_xref_depends_on_domain() {
        let xref = |domain: &str| {
            doc(vec![Node::Paragraph(vec![Node::PendingXref {
                refdomain: Some(domain.to_string()),
                reftarget: "pkg.f".to_string(),
                children: vec![inline(InlineStyle::Literal, "f()")],
            }])])
        };
        assert_eq!(render(xref("py")).markdown, "<xref:pkg.f>");
        assert_eq!(render(xref("js")).markdown, "f()");
    }

    #[test]
    fn test_malformed_field_warns_and_renders() {
        let tree = doc(vec![Node::Passthrough {
            kind: PassthroughKind::FieldList,
            children: vec![Node::Field(vec![
                Node::FieldName(vec![Node::text("extra")]),
                Node::FieldBody(vec![para("x")]),
                Node::FieldBody(vec![para("y")]),
            ])],
        }]);

        let rendered = render(tree);
        assert_eq!(rendered.warnings.len(), 1);
        assert!(matches!(
            rendered.warnings[0],
            Warning::MalformedFieldList { children: 3, .. }
        ));
        assert_eq!(rendered.markdown, "Extra\n\nx\n\ny");
    }

    #[test]
    fn test_well_formed_field_indents_body() {
        let tree = doc(vec![Node::Passthrough {
            kind: PassthroughKind::FieldList,
            children: vec![Node::Field(vec![
                Node::FieldName(vec![Node::text("Version")]),
                Node::FieldBody(vec![para("1.0")]),
            ])],
        }]);
        let rendered = render(tree);
        assert!(rendered.warnings.is_empty());
        assert_eq!(rendered.markdown, "Version:\n   1.0");
    }

    #[test]
    fn test_nested_table_is_rejected() {
        let inner = Node::Table(vec![]);
        let tree = doc(vec![Node::Table(vec![Node::Passthrough {
            kind: PassthroughKind::TGroup,
            children: vec![Node::TBody(vec![Node::Row(vec![Node::Entry {
                morerows: 0,
                morecols: 0,
                children: vec![inner],
            }])])],
        }])]);

        let result = MarkdownRenderer::default().render(&tree);
        match result {
            Err(Error::UnsupportedNestedTable { path }) => {
                assert_eq!(
                    path.to_string(),
                    "document[0]/table[0]/tgroup[0]/tbody[0]/row[0]/entry[0]/table[0]"
                );
            }
            other => panic!("expected nested table error, got {:?}", other),
        }
    }

    #[test]
    fn test_spanning_cell_is_rejected() {
        let tree = doc(vec![Node::Table(vec![Node::Row(vec![Node::Entry {
            morerows: 1,
            morecols: 0,
            children: vec![para("x")],
        }])])]);
        assert!(matches!(
            MarkdownRenderer::default().render(&tree),
            Err(Error::UnsupportedSpanningCell { .. })
        ));
    }

    #[test]
    fn test_table_collects_cells_behind_placeholder() {
        let row = |a: &str, b: &str| {
            Node::Row(vec![
                Node::Entry {
                    morerows: 0,
                    morecols: 0,
                    children: vec![para(a)],
                },
                Node::Entry {
                    morerows: 0,
                    morecols: 0,
                    children: vec![para(b)],
                },
            ])
        };
        let tree = doc(vec![Node::Table(vec![Node::Passthrough {
            kind: PassthroughKind::TGroup,
            children: vec![
                Node::ColSpec { colwidth: 10 },
                Node::ColSpec { colwidth: 12 },
                Node::Passthrough {
                    kind: PassthroughKind::THead,
                    children: vec![row("Name", "Value")],
                },
                Node::TBody(vec![row("a", "1"), row("b", "2")]),
            ],
        }])]);

        let rendered = render(tree);
        assert_eq!(rendered.markdown, "<!-- table -->");
        assert_eq!(rendered.tables.len(), 1);

        let grid = &rendered.tables[0];
        assert_eq!(grid.colwidths, vec![10, 12]);
        assert_eq!(grid.header_rows(), &[vec!["Name".to_string(), "Value".to_string()]]);
        assert_eq!(grid.body_rows().len(), 2);
        assert_eq!(grid.body_rows()[1], vec!["b", "2"]);
    }

    #[test]
    fn test_inline_delimiters_are_balanced() {
        let tree = doc(vec![Node::Paragraph(vec![
            inline(InlineStyle::Emphasis, "a"),
            Node::text(" "),
            inline(InlineStyle::Strong, "b"),
            Node::text(" "),
            inline(InlineStyle::Literal, "c"),
            Node::text(" "),
            inline(InlineStyle::Literal, "x`y"),
            Node::text(" "),
            inline(InlineStyle::Literal, "`tick"),
        ])]);
        let markdown = render(tree).markdown;
        assert_eq!(markdown, "*a* **b** `c` ``x`y`` `` `tick ``");
        assert_eq!(markdown.matches("**").count() % 2, 0);
    }

    #[test]
    fn test_sections_nest_heading_levels() {
        let tree = doc(vec![Node::Section(vec![
            Node::Title(vec![Node::text("Intro")]),
            para("Body"),
            Node::Section(vec![Node::Title(vec![Node::text("Details")]), para("More")]),
        ])]);
        assert_eq!(
            render(tree).markdown,
            "# Intro\n\nBody\n\n## Details\n\nMore"
        );
    }

    #[test]
    fn test_title_outside_section_is_bold() {
        let tree = doc(vec![Node::Figure(vec![Node::Title(vec![Node::text("Caption")])])]);
        assert_eq!(render(tree).markdown, "   **Caption**");
    }

    #[test]
    fn test_wrap_respects_width() {
        let config = RenderConfig::default().with_width(20);
        let tree = doc(vec![para("the quick brown fox jumps over the lazy dog")]);
        let markdown = render_with(config, tree).markdown;
        assert_eq!(markdown, "the quick brown fox\njumps over the lazy\ndog");
        assert!(markdown.lines().all(|line| display_width(line) <= 20));
    }

    #[test]
    fn test_wrap_counts_wide_glyphs_twice() {
        let config = RenderConfig::default().with_width(10);
        let tree = doc(vec![para("日本語日本語日本語")]);
        let markdown = render_with(config, tree).markdown;
        let lines: Vec<&str> = markdown.lines().collect();
        assert_eq!(lines, vec!["日本語日本", "語日本語"]);
        assert!(lines.iter().all(|line| display_width(line) <= 10));
    }

    #[test]
    fn test_wrap_accounts_for_indent() {
        let config = RenderConfig::default().with_width(12);
        let tree = doc(vec![Node::BlockQuote(vec![para("aaaa bbbb cccc")])]);
        let markdown = render_with(config, tree).markdown;
        assert_eq!(markdown, "   aaaa bbbb\n   cccc");
    }

    #[test]
    fn test_literal_block_is_fenced() {
        let tree = doc(vec![Node::LiteralBlock {
            language: Some("python".to_string()),
            source: None,
            caption: None,
            children: vec![Node::text("print(1)\nprint(2)")],
        }]);
        assert_eq!(render(tree).markdown, "```python\nprint(1)\nprint(2)\n```");
    }

    #[test]
    fn test_fence_outgrows_backticks_in_content() {
        let tree = doc(vec![Node::DoctestBlock(vec![Node::text(">>> s = '````'")])]);
        assert_eq!(render(tree).markdown, "`````\n>>> s = '````'\n`````");
    }

    #[test]
    fn test_literal_block_include_marker() {
        let config = RenderConfig {
            source_root: Some("/src/project".into()),
            ..RenderConfig::default()
        };
        let tree = doc(vec![Node::LiteralBlock {
            language: Some("python".to_string()),
            source: Some("/src/project/samples/demo.py".to_string()),
            caption: Some("Demo".to_string()),
            children: vec![Node::text("run()")],
        }]);
        assert_eq!(
            render_with(config, tree).markdown,
            "<!--[!code-python[Main](samples/demo.py \"Demo\")]-->\n```python\nrun()\n```"
        );
    }

    #[test]
    fn test_definition_list_with_classifier() {
        let tree = doc(vec![Node::DefinitionList(vec![Node::DefinitionListItem(vec![
            Node::Term(vec![Node::text("term")]),
            Node::Classifier(vec![Node::text("int")]),
            Node::Definition(vec![para("meaning")]),
        ])])]);
        assert_eq!(render(tree).markdown, "term : int\n   meaning");
    }

    #[test]
    fn test_footnote_and_reference() {
        let tree = doc(vec![
            Node::Paragraph(vec![
                Node::text("See "),
                Node::FootnoteReference(vec![Node::text("1")]),
            ]),
            Node::Footnote {
                label: "1".to_string(),
                children: vec![para("Footnote text.")],
            },
        ]);
        assert_eq!(render(tree).markdown, "See [1]\n\n[1] Footnote text.");
    }

    #[test]
    fn test_line_block_keeps_lines() {
        let tree = doc(vec![
            Node::LineBlock(vec![
                Node::Line(vec![Node::text("roses are red")]),
                Node::Line(vec![Node::text("violets are blue")]),
            ]),
            para("after"),
        ]);
        assert_eq!(
            render(tree).markdown,
            "roses are red\nviolets are blue\n\nafter"
        );
    }

    #[test]
    fn test_image_path_is_rewritten() {
        let tree = doc(vec![Node::Image {
            uri: "build/html/_static/diagram.png".to_string(),
            alt: Some("Diagram".to_string()),
        }]);
        let rendered = render(tree);
        assert_eq!(rendered.markdown, "![Diagram](html/_static/diagram.png)");
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn test_image_outside_static_dir_warns() {
        let tree = doc(vec![Node::Image {
            uri: "images/diagram.png".to_string(),
            alt: None,
        }]);
        let rendered = render(tree);
        assert_eq!(rendered.markdown, "");
        assert!(matches!(
            &rendered.warnings[..],
            [Warning::ImageAssetNotFound { uri, .. }] if uri == "images/diagram.png"
        ));
    }

    #[test]
    fn test_skipped_and_diagnostic_nodes() {
        let tree = doc(vec![
            Node::Skipped(SkipKind::Comment),
            para("kept"),
            Node::SystemMessage(vec![para("Unknown directive")]),
            Node::Math {
                block: true,
                children: vec![Node::text("x^2")],
            },
        ]);
        let rendered = render(tree);
        assert_eq!(rendered.markdown, "kept");
        assert_eq!(rendered.warnings.len(), 2);
        assert!(matches!(rendered.warnings[1], Warning::MathWithoutExtension { .. }));
    }

    #[test]
    fn test_signature_and_target() {
        let tree = doc(vec![
            Node::Target {
                refid: Some("anchor".to_string()),
            },
            Node::DescSignature(vec![
                Node::Passthrough {
                    kind: PassthroughKind::DescName,
                    children: vec![Node::text("frob")],
                },
                Node::DescParameterList(vec![
                    Node::DescParameter(vec![Node::text("a")]),
                    Node::DescOptional(vec![Node::DescParameter(vec![Node::text("b=1")])]),
                ]),
                Node::DescReturns(vec![Node::text("int")]),
            ]),
        ]);
        assert_eq!(
            render(tree).markdown,
            "<a name=anchor></a>\n\nfrob(a[, b=1]) -> int"
        );
    }

    #[test]
    fn test_transition_and_rubric() {
        let tree = doc(vec![
            Node::Rubric(vec![Node::text("Notes")]),
            Node::Transition,
            para("end"),
        ]);
        assert_eq!(render(tree).markdown, "-[ Notes ]-\n\n---\n\nend");
    }

    #[test]
    fn test_option_list_row() {
        let option_string = |text: &str| Node::Passthrough {
            kind: PassthroughKind::OptionString,
            children: vec![Node::text(text)],
        };
        let tree = doc(vec![Node::Passthrough {
            kind: PassthroughKind::OptionList,
            children: vec![Node::OptionListItem(vec![
                Node::OptionGroup(vec![
                    Node::OptionEntry(vec![option_string("-a")]),
                    Node::OptionEntry(vec![
                        option_string("--all"),
                        Node::OptionArgument {
                            delimiter: " ".to_string(),
                            children: vec![Node::text("ARG")],
                        },
                    ]),
                ]),
                Node::Passthrough {
                    kind: PassthroughKind::Description,
                    children: vec![para("Show everything.")],
                },
            ])],
        }]);
        assert_eq!(render(tree).markdown, "-a, --all ARG     Show everything.");
    }

    #[test]
    fn test_literal_block_keeps_trailing_whitespace() {
        let tree = doc(vec![Node::LiteralBlock {
            language: None,
            source: None,
            caption: None,
            children: vec![Node::text("keep  \nx")],
        }]);
        assert_eq!(render(tree).markdown, "```\nkeep  \nx\n```");
    }

    #[test]
    fn test_labelled_admonition_with_block_body() {
        let tree = doc(vec![Node::Admonition {
            kind: AdmonitionKind::Hint,
            children: vec![Node::LiteralBlock {
                language: None,
                source: None,
                caption: None,
                children: vec![Node::text("x = 1")],
            }],
        }]);
        assert_eq!(render(tree).markdown, "Hint:\n  ```\n  x = 1\n  ```");
    }

    #[test]
    fn test_production_list_aligns_tokens() {
        let production = |token_name: Option<&str>, text: &str| Production {
            token_name: token_name.map(String::from),
            text: text.to_string(),
        };
        let tree = doc(vec![Node::ProductionList(vec![
            production(Some("expr"), "term '+' term"),
            production(None, "term"),
            production(Some("term"), "NAME"),
        ])]);
        assert_eq!(
            render(tree).markdown,
            "   expr ::= term '+' term\n            term\n   term ::= NAME"
        );
    }

    #[test]
    fn test_acks_join_names() {
        let tree = doc(vec![Node::Acks(vec![Node::BulletList(items(&["Alice", "Bob"]))])]);
        assert_eq!(render(tree).markdown, "Alice, Bob.");
    }

    #[test]
    fn test_abbreviation_appends_explanation() {
        let tree = doc(vec![Node::Paragraph(vec![
            Node::Abbreviation {
                explanation: Some("HyperText Markup Language".to_string()),
                children: vec![Node::text("HTML")],
            },
            Node::text(" and "),
            Node::Abbreviation {
                explanation: None,
                children: vec![Node::text("CSS")],
            },
        ])]);
        assert_eq!(
            render(tree).markdown,
            "HTML (HyperText Markup Language) and CSS"
        );
    }

    #[test]
    fn test_subscript_and_superscript() {
        let tree = doc(vec![Node::Paragraph(vec![
            Node::text("H"),
            inline(InlineStyle::Subscript, "2"),
            Node::text("O and x"),
            inline(InlineStyle::Superscript, "2"),
        ])]);
        assert_eq!(render(tree).markdown, "H_2O and x^2");
    }

    #[test]
    fn test_problematic_is_marked() {
        let tree = doc(vec![Node::Paragraph(vec![inline(InlineStyle::Problematic, "oops")])]);
        assert_eq!(render(tree).markdown, ">>oops<<");
    }

    #[test]
    fn test_xref_and_term_classes_are_emphasized() {
        let classed = |classes: &[&str], text: &str| Node::Classed {
            classes: classes.iter().map(|class| class.to_string()).collect(),
            children: vec![Node::text(text)],
        };
        let tree = doc(vec![Node::Paragraph(vec![
            classed(&["xref", "py"], "f"),
            Node::text(" "),
            classed(&["term"], "word"),
            Node::text(" "),
            classed(&["custom"], "plain"),
        ])]);
        assert_eq!(render(tree).markdown, "*f* *word* plain");
    }

    #[test]
    fn test_termsep_joins_terms() {
        let tree = doc(vec![Node::DefinitionList(vec![Node::DefinitionListItem(vec![
            Node::Term(vec![Node::text("alpha"), Node::Termsep, Node::text("beta")]),
            Node::Definition(vec![para("both")]),
        ])])]);
        assert_eq!(render(tree).markdown, "alpha, beta\n   both");
    }

    #[test]
    fn test_attribution_in_block_quote() {
        let tree = doc(vec![Node::BlockQuote(vec![
            para("Quote."),
            Node::Attribution(vec![Node::text("Someone")]),
        ])]);
        assert_eq!(render(tree).markdown, "   Quote.\n\n   -- Someone");
    }

    #[test]
    fn test_citation_and_reference() {
        let tree = doc(vec![
            Node::Paragraph(vec![
                Node::text("See "),
                Node::CitationReference(vec![Node::text("CIT2002")]),
            ]),
            Node::Citation {
                label: "CIT2002".to_string(),
                children: vec![para("A citation.")],
            },
        ]);
        assert_eq!(
            render(tree).markdown,
            "See [CIT2002]\n\n[CIT2002] A citation."
        );
    }

    #[test]
    fn test_version_modified_renders_body() {
        let tree = doc(vec![
            Node::VersionModified(vec![para("New in version 2.0.")]),
            para("after"),
        ]);
        assert_eq!(render(tree).markdown, "New in version 2.0.\n\nafter");
    }

    #[test]
    fn test_number_reference_uses_title() {
        let tree = doc(vec![Node::Paragraph(vec![
            Node::text("See "),
            Node::NumberReference {
                title: Some("Fig. 1".to_string()),
            },
            Node::text(" and "),
            Node::NumberReference { title: None },
        ])]);
        assert_eq!(render(tree).markdown, "See Fig. 1 and #");
    }

    #[test]
    fn test_raw_keeps_only_text_format() {
        let tree = doc(vec![
            Node::Raw {
                format: "text".to_string(),
                text: "plain *raw*".to_string(),
            },
            Node::Raw {
                format: "html".to_string(),
                text: "<b>x</b>".to_string(),
            },
            para("after"),
        ]);
        assert_eq!(render(tree).markdown, "plain *raw*\n\nafter");
    }

    #[test]
    fn test_windows_newlines() {
        let config = RenderConfig::default().with_newline(Newline::Windows);
        let tree = doc(vec![para("a"), para("b")]);
        assert_eq!(render_with(config, tree).markdown, "a\r\n\r\nb");
    }
}

#[cfg(test)]
mod parser_tests {
    use crate::error::Error;
    use crate::parser::*;
    use crate::render_markdown;

    #[test]
    fn test_parse_text_forms() {
        let json = r#"{"tag": "document", "children": [
            {"tag": "paragraph", "children": ["Hi ", {"tag": "emphasis", "children": [{"text": "there"}]}]}
        ]}"#;
        let node = parse_doctree(json).unwrap();
        assert_eq!(node.kind(), "document");
        assert_eq!(node.astext(), "Hi there");
        assert_eq!(render_markdown(json).unwrap(), "Hi *there*");
    }

    #[test]
    fn test_parse_attributes() {
        let json = r#"{"tag": "enumerated_list", "attributes": {"start": "3"}, "children": [
            {"tag": "list_item", "children": [{"tag": "paragraph", "children": ["x"]}]}
        ]}"#;
        match parse_doctree(json).unwrap() {
            Node::EnumeratedList { start, children } => {
                assert_eq!(start, 3);
                assert_eq!(children.len(), 1);
            }
            other => panic!("unexpected node {:?}", other),
        }

        let json = r#"{"tag": "inline", "attributes": {"classes": ["xref", "py"]}, "children": ["f"]}"#;
        assert_eq!(render_markdown(json).unwrap(), "*f*");
    }

    #[test]
    fn test_footnote_label_is_split_off() {
        let json = r#"{"tag": "footnote", "children": [
            {"tag": "label", "children": ["2"]},
            {"tag": "paragraph", "children": ["body"]}
        ]}"#;
        match parse_doctree(json).unwrap() {
            Node::Footnote { label, children } => {
                assert_eq!(label, "2");
                assert_eq!(children.len(), 1);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_reports_path() {
        let json = r#"{"tag": "document", "children": [
            {"tag": "paragraph", "children": ["ok"]},
            {"tag": "section", "children": [{"tag": "bogus"}]}
        ]}"#;
        match parse_doctree(json) {
            Err(Error::UnsupportedNodeKind { kind, path }) => {
                assert_eq!(kind, "bogus");
                assert_eq!(path.to_string(), "document[0]/section[1]/bogus[0]");
            }
            other => panic!("expected unsupported kind, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_attribute() {
        let json = r#"{"tag": "image", "attributes": {"alt": "x"}}"#;
        assert!(matches!(
            parse_doctree(json),
            Err(Error::MalformedNode { ref kind, .. }) if kind == "image"
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_doctree("{not json"), Err(Error::Json(_))));
    }
}
