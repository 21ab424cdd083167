//! Documentation-comment decoration.
//!
//! [`Commented`] wraps any block: it renders the translated documentation of the wrapped construct as a JSDoc
//! comment, then delegates to the block unchanged. Translation failures never abort emission; the comment is left
//! out and a [`DocumentationFault`](super::errors::DocumentationFault) warning is recorded on the context.
//!
//! ## See also
//! - [`xml`]: the XML documentation dialect translator

mod xml;

pub use xml::{DocError, XmlDocTranslator};

use bridgejs_core::lang::types;
use bridgejs_model::{Accessibility, Member, MemberKind, Param, Span, TypeDecl, TypeKind};

use super::blocks::Emit;
use super::context::EmissionContext;
use super::errors::EmissionFault;
use crate::config::DocumentationLevel;

/// A documentation comment in dialect-neutral form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocComment {
    pub summary: Vec<String>,
    pub remarks: Vec<String>,
    pub params: Vec<DocParam>,
    pub returns: Option<String>,
    pub throws: Vec<DocThrows>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocThrows {
    pub ty: String,
    pub text: String,
}

/// Translates one raw documentation comment.
pub trait DocTranslator {
    fn translate(&self, raw: &str) -> Result<DocComment, DocError>;
}

/// The declaration whose documentation is rendered.
#[derive(Debug, Clone, Copy)]
pub enum DocSubject<'m> {
    Type(&'m TypeDecl),
    Member { owner: &'m TypeDecl, member: &'m Member },
}

impl DocSubject<'_> {
    fn raw(&self) -> Option<&str> {
        match self {
            DocSubject::Type(ty) => ty.doc.as_deref(),
            DocSubject::Member { member, .. } => member.doc.as_deref(),
        }
    }

    fn identity(&self) -> String {
        match self {
            DocSubject::Type(ty) => ty.full_name(),
            DocSubject::Member { owner, member } => format!("{}.{}", owner.full_name(), member.name),
        }
    }

    fn span(&self) -> Span {
        match self {
            DocSubject::Type(ty) => ty.span,
            DocSubject::Member { member, .. } => member.span,
        }
    }
}

/// A block rendered after its documentation comment.
pub struct Commented<'m, B> {
    pub subject: DocSubject<'m>,
    pub inner: B,
}

impl<'m, B: Emit> Commented<'m, B> {
    pub fn new(subject: DocSubject<'m>, inner: B) -> Self {
        Self { subject, inner }
    }
}

impl<B: Emit> Emit for Commented<'_, B> {
    fn emit(&self, ctx: &mut EmissionContext<'_>) -> Result<(), EmissionFault> {
        emit_comment(ctx, self.subject);
        self.inner.emit(ctx)
    }
}

fn emit_comment(ctx: &mut EmissionContext<'_>, subject: DocSubject<'_>) {
    let level = ctx.options().documentation;
    if level == DocumentationLevel::None {
        return;
    }
    let Some(raw) = subject.raw() else {
        return;
    };
    if raw.trim().is_empty() {
        return;
    }
    match ctx.docs().translate(raw) {
        Ok(doc) => {
            let lines = jsdoc_lines(&doc, subject, level);
            if lines.is_empty() {
                return;
            }
            ctx.writeln("/**");
            for line in lines {
                if line.is_empty() {
                    ctx.writeln(" *");
                } else {
                    ctx.writeln(&format!(" * {}", line.replace("*/", "*\\/")));
                }
            }
            ctx.writeln(" */");
        }
        Err(e) => ctx.warn_documentation(&subject.identity(), subject.span(), e.to_string()),
    }
}

/// Body lines of the JSDoc comment (without the `/**` frame).
pub fn jsdoc_lines(doc: &DocComment, subject: DocSubject<'_>, level: DocumentationLevel) -> Vec<String> {
    let mut text = doc.summary.clone();
    if !doc.remarks.is_empty() {
        if !text.is_empty() {
            text.push(String::new());
        }
        text.extend(doc.remarks.iter().cloned());
    }

    let mut tags = Vec::new();
    if level == DocumentationLevel::Full {
        tags.extend(scope_tags(subject));
    }
    let params = signature(subject);
    for param in &doc.params {
        let ty = params.iter().find(|p| p.name == param.name).map(|p| types::ts_type(p.ty.name()));
        tags.push(match ty {
            Some(ty) => format!("@param {{{}}} {} {}", ty, param.name, param.text).trim_end().to_string(),
            None => format!("@param {} {}", param.name, param.text).trim_end().to_string(),
        });
    }
    if let Some(returns) = &doc.returns {
        match return_type(subject) {
            Some(ty) => tags.push(format!("@return {{{}}} {}", types::ts_type(ty), returns).trim_end().to_string()),
            None => tags.push(format!("@return {}", returns).trim_end().to_string()),
        }
    }
    for throws in &doc.throws {
        tags.push(format!("@throws {{{}}} {}", throws.ty, throws.text).trim_end().to_string());
    }

    if !text.is_empty() && !tags.is_empty() {
        text.push(String::new());
    }
    text.extend(tags);
    text
}

fn scope_tags(subject: DocSubject<'_>) -> Vec<String> {
    match subject {
        DocSubject::Type(ty) => {
            let tag = match ty.kind {
                TypeKind::Class | TypeKind::Struct => "@class",
                TypeKind::Interface => "@interface",
                TypeKind::Enum => "@enum",
            };
            vec![format!("{} {}", tag, ty.full_name())]
        }
        DocSubject::Member { owner, member } => {
            let placement = if member.is_static || matches!(member.kind, MemberKind::Constant { .. }) {
                "@static"
            } else {
                "@instance"
            };
            let access = match member.accessibility {
                Accessibility::Public => "@public",
                Accessibility::Protected => "@protected",
                Accessibility::Internal => "@package",
                Accessibility::Private => "@private",
            };
            vec![
                placement.to_string(),
                access.to_string(),
                format!("@memberof {}", owner.full_name()),
            ]
        }
    }
}

fn signature<'m>(subject: DocSubject<'m>) -> &'m [Param] {
    match subject {
        DocSubject::Member { member, .. } => match &member.kind {
            MemberKind::Method { params, .. } | MemberKind::Constructor { params, .. } => params,
            _ => &[],
        },
        DocSubject::Type(_) => &[],
    }
}

fn return_type<'m>(subject: DocSubject<'m>) -> Option<&'m str> {
    match subject {
        DocSubject::Member { member, .. } => match &member.kind {
            MemberKind::Method { return_type, .. } => Some(return_type.name()),
            MemberKind::Property { ty, .. } => Some(ty.name()),
            _ => None,
        },
        DocSubject::Type(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::emit::context::EmitOptions;
    use crate::backend::emit::resolver::ProgramResolver;
    use bridgejs_model::ResolvedProgram;

    struct Marker;

    impl Emit for Marker {
        fn emit(&self, ctx: &mut EmissionContext<'_>) -> Result<(), EmissionFault> {
            ctx.writeln("body");
            Ok(())
        }
    }

    fn render(level: DocumentationLevel, owner: &TypeDecl, member: &Member) -> (String, usize) {
        let options = EmitOptions {
            documentation: level,
            ..EmitOptions::default()
        };
        let program = ResolvedProgram::new("Demo");
        let resolver = ProgramResolver::new(&program);
        let mut ctx = EmissionContext::new(&options, &resolver, &XmlDocTranslator);
        Commented::new(DocSubject::Member { owner, member }, Marker).emit(&mut ctx).unwrap();
        let warnings = ctx.take_warnings().len();
        (ctx.take_output(), warnings)
    }

    fn add_method(doc: &str) -> (TypeDecl, Member) {
        let member = Member::method(
            "Add",
            vec![Param::new("a", "System.Int32")],
            "System.Int32",
            vec![],
        )
        .with_doc(doc);
        (TypeDecl::class("N1", "Calc"), member)
    }

    #[test]
    fn basic_level_renders_description_params_and_return() {
        let (owner, member) = add_method("<summary>Adds.</summary><param name=\"a\">Left.</param><returns>Sum.</returns>");
        let (out, warnings) = render(DocumentationLevel::Basic, &owner, &member);
        assert_eq!(warnings, 0);
        insta::assert_snapshot!(out, @r"
        /**
         * Adds.
         *
         * @param {number} a Left.
         * @return {number} Sum.
         */
        body
        ");
    }

    #[test]
    fn full_level_adds_scope_tags() {
        let (owner, member) = add_method("<summary>Adds.</summary>");
        let (out, _) = render(DocumentationLevel::Full, &owner, &member);
        assert!(out.contains(" * @instance\n * @public\n * @memberof N1.Calc\n"));
    }

    #[test]
    fn none_level_and_missing_docs_emit_nothing() {
        let (owner, member) = add_method("<summary>Adds.</summary>");
        assert_eq!(render(DocumentationLevel::None, &owner, &member).0, "body\n");
        let bare = Member::method("Run", vec![], "System.Void", vec![]);
        assert_eq!(render(DocumentationLevel::Full, &owner, &bare).0, "body\n");
    }

    #[test]
    fn malformed_documentation_degrades_to_plain_output() {
        let (owner, member) = add_method("<summary>Adds.");
        let (out, warnings) = render(DocumentationLevel::Basic, &owner, &member);
        assert_eq!(out, "body\n");
        assert_eq!(warnings, 1);
    }
}
