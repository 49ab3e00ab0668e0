// Node vocabulary of the docutils/Sphinx document tree, as a closed sum type.

/// Structural kinds that render nothing themselves; only their children show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughKind {
    Document,
    Compound,
    Container,
    Glossary,
    Centered,
    Hlist,
    HlistCol,
    Caption,
    Legend,
    Description,
    Generated,
    Subtitle,
    CompactParagraph,
    FieldList,
    OptionList,
    OptionString,
    TGroup,
    THead,
    Desc,
    DescName,
    DescAddname,
    DescType,
    DescAnnotation,
    SubstitutionReference,
    DownloadReference,
}

impl PassthroughKind {
    pub fn tag(self) -> &'static str {
        match self {
            PassthroughKind::Document => "document",
            PassthroughKind::Compound => "compound",
            PassthroughKind::Container => "container",
            PassthroughKind::Glossary => "glossary",
            PassthroughKind::Centered => "centered",
            PassthroughKind::Hlist => "hlist",
            PassthroughKind::HlistCol => "hlistcol",
            PassthroughKind::Caption => "caption",
            PassthroughKind::Legend => "legend",
            PassthroughKind::Description => "description",
            PassthroughKind::Generated => "generated",
            PassthroughKind::Subtitle => "subtitle",
            PassthroughKind::CompactParagraph => "compact_paragraph",
            PassthroughKind::FieldList => "field_list",
            PassthroughKind::OptionList => "option_list",
            PassthroughKind::OptionString => "option_string",
            PassthroughKind::TGroup => "tgroup",
            PassthroughKind::THead => "thead",
            PassthroughKind::Desc => "desc",
            PassthroughKind::DescName => "desc_name",
            PassthroughKind::DescAddname => "desc_addname",
            PassthroughKind::DescType => "desc_type",
            PassthroughKind::DescAnnotation => "desc_annotation",
            PassthroughKind::SubstitutionReference => "substitution_reference",
            PassthroughKind::DownloadReference => "download_reference",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "document" => PassthroughKind::Document,
            "compound" => PassthroughKind::Compound,
            "container" => PassthroughKind::Container,
            "glossary" => PassthroughKind::Glossary,
            "centered" => PassthroughKind::Centered,
            "hlist" => PassthroughKind::Hlist,
            "hlistcol" => PassthroughKind::HlistCol,
            "caption" => PassthroughKind::Caption,
            "legend" => PassthroughKind::Legend,
            "description" => PassthroughKind::Description,
            "generated" => PassthroughKind::Generated,
            "subtitle" => PassthroughKind::Subtitle,
            "compact_paragraph" => PassthroughKind::CompactParagraph,
            "field_list" => PassthroughKind::FieldList,
            "option_list" => PassthroughKind::OptionList,
            "option_string" => PassthroughKind::OptionString,
            "tgroup" => PassthroughKind::TGroup,
            "thead" => PassthroughKind::THead,
            "desc" => PassthroughKind::Desc,
            "desc_name" => PassthroughKind::DescName,
            "desc_addname" => PassthroughKind::DescAddname,
            "desc_type" => PassthroughKind::DescType,
            "desc_annotation" => PassthroughKind::DescAnnotation,
            "substitution_reference" => PassthroughKind::SubstitutionReference,
            "download_reference" => PassthroughKind::DownloadReference,
            _ => return None,
        };
        Some(kind)
    }
}

/// Kinds that are dropped together with their subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    Comment,
    Meta,
    Index,
    Toctree,
    SubstitutionDefinition,
    HighlightLang,
    Topic,
    Sidebar,
    Label,
    TabularColSpec,
}

impl SkipKind {
    pub fn tag(self) -> &'static str {
        match self {
            SkipKind::Comment => "comment",
            SkipKind::Meta => "meta",
            SkipKind::Index => "index",
            SkipKind::Toctree => "toctree",
            SkipKind::SubstitutionDefinition => "substitution_definition",
            SkipKind::HighlightLang => "highlightlang",
            SkipKind::Topic => "topic",
            SkipKind::Sidebar => "sidebar",
            SkipKind::Label => "label",
            SkipKind::TabularColSpec => "tabular_col_spec",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "comment" => SkipKind::Comment,
            "meta" => SkipKind::Meta,
            "index" => SkipKind::Index,
            "toctree" => SkipKind::Toctree,
            "substitution_definition" => SkipKind::SubstitutionDefinition,
            "highlightlang" => SkipKind::HighlightLang,
            "topic" => SkipKind::Topic,
            "sidebar" => SkipKind::Sidebar,
            "label" => SkipKind::Label,
            "tabular_col_spec" => SkipKind::TabularColSpec,
            _ => return None,
        };
        Some(kind)
    }
}

/// Inline kinds rendered as a pair of delimiters around their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    Emphasis,
    LiteralEmphasis,
    Strong,
    LiteralStrong,
    TitleReference,
    Literal,
    Subscript,
    Superscript,
    Problematic,
}

impl InlineStyle {
    pub fn tag(self) -> &'static str {
        match self {
            InlineStyle::Emphasis => "emphasis",
            InlineStyle::LiteralEmphasis => "literal_emphasis",
            InlineStyle::Strong => "strong",
            InlineStyle::LiteralStrong => "literal_strong",
            InlineStyle::TitleReference => "title_reference",
            InlineStyle::Literal => "literal",
            InlineStyle::Subscript => "subscript",
            InlineStyle::Superscript => "superscript",
            InlineStyle::Problematic => "problematic",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let style = match tag {
            "emphasis" => InlineStyle::Emphasis,
            "literal_emphasis" => InlineStyle::LiteralEmphasis,
            "strong" => InlineStyle::Strong,
            "literal_strong" => InlineStyle::LiteralStrong,
            "title_reference" => InlineStyle::TitleReference,
            "literal" => InlineStyle::Literal,
            "subscript" => InlineStyle::Subscript,
            "superscript" => InlineStyle::Superscript,
            "problematic" => InlineStyle::Problematic,
            _ => return None,
        };
        Some(style)
    }

    /// Opening and closing delimiters. Literal spans are sized from their
    /// content by the renderer and report plain single backticks here.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            InlineStyle::Emphasis | InlineStyle::LiteralEmphasis | InlineStyle::TitleReference => {
                ("*", "*")
            }
            InlineStyle::Strong | InlineStyle::LiteralStrong => ("**", "**"),
            InlineStyle::Literal => ("`", "`"),
            InlineStyle::Subscript => ("_", ""),
            InlineStyle::Superscript => ("^", ""),
            InlineStyle::Problematic => (">>", "<<"),
        }
    }
}

/// Callout kinds. The first five render as quoted alert blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Note,
    Warning,
    Tip,
    Important,
    Caution,
    Attention,
    Danger,
    Error,
    Hint,
    SeeAlso,
    Generic,
}

impl AdmonitionKind {
    pub fn tag(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "note",
            AdmonitionKind::Warning => "warning",
            AdmonitionKind::Tip => "tip",
            AdmonitionKind::Important => "important",
            AdmonitionKind::Caution => "caution",
            AdmonitionKind::Attention => "attention",
            AdmonitionKind::Danger => "danger",
            AdmonitionKind::Error => "error",
            AdmonitionKind::Hint => "hint",
            AdmonitionKind::SeeAlso => "seealso",
            AdmonitionKind::Generic => "admonition",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "note" => AdmonitionKind::Note,
            "warning" => AdmonitionKind::Warning,
            "tip" => AdmonitionKind::Tip,
            "important" => AdmonitionKind::Important,
            "caution" => AdmonitionKind::Caution,
            "attention" => AdmonitionKind::Attention,
            "danger" => AdmonitionKind::Danger,
            "error" => AdmonitionKind::Error,
            "hint" => AdmonitionKind::Hint,
            "seealso" => AdmonitionKind::SeeAlso,
            "admonition" => AdmonitionKind::Generic,
            _ => return None,
        };
        Some(kind)
    }

    /// Tag shown inside `> [!TAG]` for alert-box kinds.
    pub fn alert_tag(self) -> Option<&'static str> {
        match self {
            AdmonitionKind::Note => Some("NOTE"),
            AdmonitionKind::Warning => Some("WARNING"),
            AdmonitionKind::Tip => Some("TIP"),
            AdmonitionKind::Important => Some("IMPORTANT"),
            AdmonitionKind::Caution => Some("CAUTION"),
            _ => None,
        }
    }

    /// Human label used as a prefix for the labelled kinds.
    pub fn label(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "Note",
            AdmonitionKind::Warning => "Warning",
            AdmonitionKind::Tip => "Tip",
            AdmonitionKind::Important => "Important",
            AdmonitionKind::Caution => "Caution",
            AdmonitionKind::Attention => "Attention",
            AdmonitionKind::Danger => "Danger",
            AdmonitionKind::Error => "Error",
            AdmonitionKind::Hint => "Hint",
            AdmonitionKind::SeeAlso => "See also",
            AdmonitionKind::Generic => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub token_name: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Passthrough {
        kind: PassthroughKind,
        children: Vec<Node>,
    },
    Skipped(SkipKind),

    Section(Vec<Node>),
    Title(Vec<Node>),
    Rubric(Vec<Node>),
    Paragraph(Vec<Node>),
    Transition,

    BulletList(Vec<Node>),
    EnumeratedList {
        start: usize,
        children: Vec<Node>,
    },
    ListItem(Vec<Node>),
    DefinitionList(Vec<Node>),
    DefinitionListItem(Vec<Node>),
    Term(Vec<Node>),
    Termsep,
    Classifier(Vec<Node>),
    Definition(Vec<Node>),

    Field(Vec<Node>),
    FieldName(Vec<Node>),
    FieldBody(Vec<Node>),

    OptionListItem(Vec<Node>),
    OptionGroup(Vec<Node>),
    OptionEntry(Vec<Node>),
    OptionArgument {
        delimiter: String,
        children: Vec<Node>,
    },

    Admonition {
        kind: AdmonitionKind,
        children: Vec<Node>,
    },
    VersionModified(Vec<Node>),

    LiteralBlock {
        language: Option<String>,
        source: Option<String>,
        caption: Option<String>,
        children: Vec<Node>,
    },
    DoctestBlock(Vec<Node>),
    LineBlock(Vec<Node>),
    Line(Vec<Node>),
    BlockQuote(Vec<Node>),
    Attribution(Vec<Node>),

    Footnote {
        label: String,
        children: Vec<Node>,
    },
    Citation {
        label: String,
        children: Vec<Node>,
    },
    Figure(Vec<Node>),
    Image {
        uri: String,
        alt: Option<String>,
    },

    Table(Vec<Node>),
    ColSpec {
        colwidth: usize,
    },
    TBody(Vec<Node>),
    Row(Vec<Node>),
    Entry {
        morerows: usize,
        morecols: usize,
        children: Vec<Node>,
    },

    ProductionList(Vec<Production>),
    Acks(Vec<Node>),
    Target {
        refid: Option<String>,
    },

    DescSignature(Vec<Node>),
    DescParameterList(Vec<Node>),
    DescParameter(Vec<Node>),
    DescOptional(Vec<Node>),
    DescReturns(Vec<Node>),
    DescContent(Vec<Node>),

    Inline {
        style: InlineStyle,
        children: Vec<Node>,
    },
    Abbreviation {
        explanation: Option<String>,
        children: Vec<Node>,
    },
    Classed {
        classes: Vec<String>,
        children: Vec<Node>,
    },
    Reference {
        refid: Option<String>,
        refuri: Option<String>,
        children: Vec<Node>,
    },
    PendingXref {
        refdomain: Option<String>,
        reftarget: String,
        children: Vec<Node>,
    },
    NumberReference {
        title: Option<String>,
    },
    FootnoteReference(Vec<Node>),
    CitationReference(Vec<Node>),

    SystemMessage(Vec<Node>),
    Math {
        block: bool,
        children: Vec<Node>,
    },
    Raw {
        format: String,
        text: String,
    },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// The docutils tag name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "#text",
            Node::Passthrough { kind, .. } => kind.tag(),
            Node::Skipped(kind) => kind.tag(),
            Node::Section(_) => "section",
            Node::Title(_) => "title",
            Node::Rubric(_) => "rubric",
            Node::Paragraph(_) => "paragraph",
            Node::Transition => "transition",
            Node::BulletList(_) => "bullet_list",
            Node::EnumeratedList { .. } => "enumerated_list",
            Node::ListItem(_) => "list_item",
            Node::DefinitionList(_) => "definition_list",
            Node::DefinitionListItem(_) => "definition_list_item",
            Node::Term(_) => "term",
            Node::Termsep => "termsep",
            Node::Classifier(_) => "classifier",
            Node::Definition(_) => "definition",
            Node::Field(_) => "field",
            Node::FieldName(_) => "field_name",
            Node::FieldBody(_) => "field_body",
            Node::OptionListItem(_) => "option_list_item",
            Node::OptionGroup(_) => "option_group",
            Node::OptionEntry(_) => "option",
            Node::OptionArgument { .. } => "option_argument",
            Node::Admonition { kind, .. } => kind.tag(),
            Node::VersionModified(_) => "versionmodified",
            Node::LiteralBlock { .. } => "literal_block",
            Node::DoctestBlock(_) => "doctest_block",
            Node::LineBlock(_) => "line_block",
            Node::Line(_) => "line",
            Node::BlockQuote(_) => "block_quote",
            Node::Attribution(_) => "attribution",
            Node::Footnote { .. } => "footnote",
            Node::Citation { .. } => "citation",
            Node::Figure(_) => "figure",
            Node::Image { .. } => "image",
            Node::Table(_) => "table",
            Node::ColSpec { .. } => "colspec",
            Node::TBody(_) => "tbody",
            Node::Row(_) => "row",
            Node::Entry { .. } => "entry",
            Node::ProductionList(_) => "productionlist",
            Node::Acks(_) => "acks",
            Node::Target { .. } => "target",
            Node::DescSignature(_) => "desc_signature",
            Node::DescParameterList(_) => "desc_parameterlist",
            Node::DescParameter(_) => "desc_parameter",
            Node::DescOptional(_) => "desc_optional",
            Node::DescReturns(_) => "desc_returns",
            Node::DescContent(_) => "desc_content",
            Node::Inline { style, .. } => style.tag(),
            Node::Abbreviation { .. } => "abbreviation",
            Node::Classed { .. } => "inline",
            Node::Reference { .. } => "reference",
            Node::PendingXref { .. } => "pending_xref",
            Node::NumberReference { .. } => "number_reference",
            Node::FootnoteReference(_) => "footnote_reference",
            Node::CitationReference(_) => "citation_reference",
            Node::SystemMessage(_) => "system_message",
            Node::Math { block: false, .. } => "math",
            Node::Math { block: true, .. } => "math_block",
            Node::Raw { .. } => "raw",
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_)
            | Node::Skipped(_)
            | Node::Transition
            | Node::Termsep
            | Node::Image { .. }
            | Node::ColSpec { .. }
            | Node::ProductionList(_)
            | Node::Target { .. }
            | Node::NumberReference { .. }
            | Node::Raw { .. } => &[],

            Node::Passthrough { children, .. }
            | Node::EnumeratedList { children, .. }
            | Node::OptionArgument { children, .. }
            | Node::Admonition { children, .. }
            | Node::LiteralBlock { children, .. }
            | Node::Footnote { children, .. }
            | Node::Citation { children, .. }
            | Node::Entry { children, .. }
            | Node::Inline { children, .. }
            | Node::Abbreviation { children, .. }
            | Node::Classed { children, .. }
            | Node::Reference { children, .. }
            | Node::PendingXref { children, .. }
            | Node::Math { children, .. } => children,

            Node::Section(children)
            | Node::Title(children)
            | Node::Rubric(children)
            | Node::Paragraph(children)
            | Node::BulletList(children)
            | Node::ListItem(children)
            | Node::DefinitionList(children)
            | Node::DefinitionListItem(children)
            | Node::Term(children)
            | Node::Classifier(children)
            | Node::Definition(children)
            | Node::Field(children)
            | Node::FieldName(children)
            | Node::FieldBody(children)
            | Node::OptionListItem(children)
            | Node::OptionGroup(children)
            | Node::OptionEntry(children)
            | Node::VersionModified(children)
            | Node::DoctestBlock(children)
            | Node::LineBlock(children)
            | Node::Line(children)
            | Node::BlockQuote(children)
            | Node::Attribution(children)
            | Node::Figure(children)
            | Node::Table(children)
            | Node::TBody(children)
            | Node::Row(children)
            | Node::Acks(children)
            | Node::DescSignature(children)
            | Node::DescParameterList(children)
            | Node::DescParameter(children)
            | Node::DescOptional(children)
            | Node::DescReturns(children)
            | Node::DescContent(children)
            | Node::FootnoteReference(children)
            | Node::CitationReference(children)
            | Node::SystemMessage(children) => children,
        }
    }

    /// Concatenated text of all text leaves below this node.
    pub fn astext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Raw { text, .. } => out.push_str(text),
            Node::ProductionList(productions) => {
                for production in productions {
                    out.push_str(&production.text);
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Whether this node starts a block of its own (anything but text and
    /// inline markup).
    pub fn is_block(&self) -> bool {
        !matches!(
            self,
            Node::Text(_)
                | Node::Inline { .. }
                | Node::Abbreviation { .. }
                | Node::Classed { .. }
                | Node::Reference { .. }
                | Node::PendingXref { .. }
                | Node::NumberReference { .. }
                | Node::FootnoteReference(_)
                | Node::CitationReference(_)
                | Node::Math { block: false, .. }
        )
    }
}
