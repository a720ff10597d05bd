// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::error::AppError,
    models::finance::{Invoice, TAX_RATE},
};

/// Dados do emissor impressos em toda fatura (vêm da configuração).
#[derive(Debug, Clone, Default)]
pub struct IssuerProfile {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub iban: Option<String>,
}

/// Nome do arquivo baixado pelo navegador.
pub fn pdf_file_name(invoice: &Invoice) -> String {
    let reference: String = invoice
        .reference
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("Invoice_{}.pdf", reference)
}

/// Rodapé fixo de pagamento; o IBAN entra só se estiver configurado.
fn payment_footer(issuer: &IssuerProfile) -> Vec<String> {
    let mut lines = vec!["Forma de pago: transferencia bancaria".to_string()];
    if let Some(iban) = &issuer.iban {
        lines.push(format!("IBAN: {}", iban));
    }
    lines
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    issuer: IssuerProfile,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>, issuer: IssuerProfile) -> Self {
        Self { fonts_dir: fonts_dir.into(), issuer }
    }

    /// Renderiza a fatura em A4. Sem estado: tudo vem da fatura e do emissor.
    pub fn render_invoice(&self, invoice: &Invoice, client_name: Option<&str>) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|_| {
            AppError::FontNotFound(format!("Roboto não encontrada em {}", self.fonts_dir.display()))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Factura {}", invoice.reference));
        doc.set_paper_size(genpdf::PaperSize::A4);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(format!("FACTURA {}", invoice.reference))
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        let issued = invoice
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        doc.push(elements::Paragraph::new(format!("Fecha: {}", issued)));
        doc.push(elements::Break::new(1.5));

        // --- EMISSOR / DESTINATÁRIO ---
        let mut parties = elements::TableLayout::new(vec![1, 1]);
        let small = style::Style::new().with_font_size(9);
        parties
            .row()
            .element(self.issuer_block().styled(small))
            .element(recipient_block(invoice, client_name).styled(small))
            .push()
            .map_err(pdf_error)?;
        doc.push(parties);
        doc.push(elements::Break::new(2));

        // --- ITEM ÚNICO ---
        let mut table = elements::TableLayout::new(vec![5, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Concepto").styled(bold))
            .element(elements::Paragraph::new("Importe").styled(bold))
            .push()
            .map_err(pdf_error)?;
        let concept = invoice
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Servicios de promoción".to_string());
        table
            .row()
            .element(elements::Paragraph::new(concept).padded(1))
            .element(money_cell(invoice.base_price))
            .push()
            .map_err(pdf_error)?;
        doc.push(table);
        doc.push(elements::Break::new(1));

        // --- TOTAIS ---
        let rate = (TAX_RATE * rust_decimal::Decimal::ONE_HUNDRED).normalize();
        for (label, amount) in [
            ("Base imponible".to_string(), invoice.base_price),
            (format!("IVA ({}%)", rate), invoice.tax_amount),
        ] {
            let mut line = elements::Paragraph::new(format!("{}: {:.2} €", label, amount));
            line.set_alignment(Alignment::Right);
            doc.push(line);
        }
        let mut total = elements::Paragraph::new(format!("TOTAL: {:.2} €", invoice.total()));
        total.set_alignment(Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        // --- RODAPÉ (TRANSFERÊNCIA) ---
        doc.push(elements::Break::new(3));
        for line in payment_footer(&self.issuer) {
            doc.push(
                elements::Paragraph::new(line).styled(style::Style::new().italic().with_font_size(9)),
            );
        }

        // Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        tracing::debug!("PDF da fatura {} gerado ({} bytes)", invoice.reference, buffer.len());
        Ok(buffer)
    }

    fn issuer_block(&self) -> elements::LinearLayout {
        let mut block = elements::LinearLayout::vertical();
        block.push(elements::Paragraph::new(self.issuer.name.clone()).styled(style::Style::new().bold()));
        if let Some(tax_id) = &self.issuer.tax_id {
            block.push(elements::Paragraph::new(format!("NIF: {}", tax_id)));
        }
        if let Some(address) = &self.issuer.address {
            block.push(elements::Paragraph::new(address.clone()));
        }
        block
    }
}

fn recipient_block(invoice: &Invoice, client_name: Option<&str>) -> elements::LinearLayout {
    let mut block = elements::LinearLayout::vertical();
    block.push(elements::Paragraph::new(invoice.payer_name.clone()).styled(style::Style::new().bold()));
    if let Some(name) = client_name.filter(|n| *n != invoice.payer_name) {
        block.push(elements::Paragraph::new(format!("({})", name)));
    }
    if let Some(tax_id) = &invoice.payer_tax_id {
        block.push(elements::Paragraph::new(format!("NIF: {}", tax_id)));
    }
    if let Some(address) = &invoice.payer_address {
        block.push(elements::Paragraph::new(address.clone()));
    }
    block
}

fn money_cell(amount: rust_decimal::Decimal) -> impl Element {
    let mut cell = elements::Paragraph::new(format!("{:.2} €", amount));
    cell.set_alignment(Alignment::Right);
    cell.padded(1)
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::CollectionStatus;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn payment_footer_is_always_printed() {
        let lines = payment_footer(&IssuerProfile::default());
        assert_eq!(lines, vec!["Forma de pago: transferencia bancaria".to_string()]);

        let issuer = IssuerProfile {
            iban: Some("ES91 2100 0418 4502 0005 1332".into()),
            ..IssuerProfile::default()
        };
        let lines = payment_footer(&issuer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "IBAN: ES91 2100 0418 4502 0005 1332");
    }

    fn invoice(reference: &str) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            date: None,
            reference: reference.to_string(),
            client_id: Uuid::new_v4(),
            payer_name: "Acme S.L.".into(),
            payer_tax_id: None,
            payer_address: None,
            base_price: Decimal::new(1000, 0),
            tax_amount: Decimal::new(21000, 2),
            collection_status: CollectionStatus::NotCollected,
            collection_date: None,
            description: None,
        }
    }

    #[test]
    fn file_name_follows_the_reference() {
        assert_eq!(pdf_file_name(&invoice("2024-017")), "Invoice_2024-017.pdf");
        assert_eq!(pdf_file_name(&invoice("A/7 \"x\"")), "Invoice_A_7__x_.pdf");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let service = DocumentService::new(dir.path(), IssuerProfile::default());

        let err = service.render_invoice(&invoice("2024-001"), Some("Acme")).unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
